pub mod client;

pub use client::Client;
pub use client::Error;
pub use client::Interface;
pub use client::Quote;
