mod browser;
mod clients;
#[cfg(test)]
mod test_server;

pub use browser::HttpBrowser;
pub use clients::{steam::SteamClient, telegram::TelegramClient};
