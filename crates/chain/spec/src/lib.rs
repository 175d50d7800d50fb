//! Types describing a fork of the Lynx chain: its header layout and
//! validation rules, how its transactions and receipts are decoded, and the
//! execution context of its blocks.

mod context;
mod fork;

pub use self::{
    context::{ContextOptions, ExecutionContext},
    fork::{ForkConfig, ForkSpec, ReceiptBuilder, TransactionBuilder},
};
