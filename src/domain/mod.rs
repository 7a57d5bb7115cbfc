mod category;
mod effect;
mod money;
mod page;
mod transaction;
mod transfer;
mod wallet;

pub use category::*;
pub use effect::*;
pub use money::*;
pub use page::*;
pub use transaction::*;
pub use transfer::*;
pub use wallet::*;
