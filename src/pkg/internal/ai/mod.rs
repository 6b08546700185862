pub mod client;
pub mod prompt;
pub mod read;
pub mod tailor;
