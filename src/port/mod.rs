//! Trait seams between the core and its external collaborators.

mod notifier;
mod sale;

pub use notifier::{LogNotifier, Notice, NoticeKind, Notifier, NotifierRegistry, NullNotifier};
pub use sale::{PurchaseGateway, SaleReader};
