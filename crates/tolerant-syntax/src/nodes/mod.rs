mod node;
mod token;
mod tree;

pub(crate) use node::{Child, Node, NodeId};
pub(crate) use token::{Token, TokenId};
pub(crate) use tree::{idx, idx_u32};
pub use tree::SyntaxTree;
