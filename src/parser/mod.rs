mod common;
mod ruby;

pub use common::{
    attached_sig, call_name, descendants, enclosing_statement, is_comment,
    is_sig_call, named_children, node_text, previous_statement,
};
pub use ruby::RubyParser;
