pub mod canned;
pub mod config;
pub mod echo;
pub mod traits;

pub use canned::{CannedReplyGenerator, DEFAULT_RESPONSES};
pub use config::{GeneratorConfig, GeneratorFactory};
pub use echo::EchoReplyGenerator;
pub use traits::ReplyGenerator;
