pub mod codec;
pub mod store;
pub mod sync;

pub use crate::domain::model::{Member, MemberRecord, Person, Roster};
pub use crate::domain::ports::{ConfigProvider, MemberSource, Storage};
pub use crate::utils::error::Result;
