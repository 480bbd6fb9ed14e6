pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        production: bool,
        logout_redirect: String,
    },
}
