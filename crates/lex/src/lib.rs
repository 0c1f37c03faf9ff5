pub mod keywords;
mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{LexError, LexOutput, Token, TokenKind};
