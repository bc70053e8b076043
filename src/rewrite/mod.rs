//! Rewrites over built algebra trees
//!
//! - [`slice`]: locate-or-insert the limit/offset node
//! - [`describe`]: turn a describe-shaped tree into a filtered construct

pub mod describe;
pub mod slice;

pub use describe::{
    describe_projection, is_describe_shaped, rewrite_describe, try_rewrite_describe,
    DescribeScope, Rewritten, DESCRIBE_CONTEXT, DESCRIBE_OBJECT, DESCRIBE_PREDICATE,
    DESCRIBE_PREFIX, DESCRIBE_SUBJECT,
};
pub use slice::{set_limit, set_limit_and_offset, set_offset, SliceChange};

use thiserror::Error;

/// Rewrite errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("Unsupported rewrite: {0}")]
    UnsupportedRewrite(String),
}

pub type RewriteResult<T> = Result<T, RewriteError>;
