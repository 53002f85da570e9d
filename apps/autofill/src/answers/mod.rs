// Form-filling decision engine: answer memory with fuzzy recall, and the
// resolver that falls back to generation on a miss.

pub mod field;
pub mod handlers;
pub mod prompts;
pub mod resolver;
pub mod similarity;
pub mod store;
