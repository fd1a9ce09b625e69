#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]

mod completion;
mod openai;
mod sonar;

pub use completion::*;
pub use openai::OpenAiClient;
pub use sonar::SonarClient;
