//! Linear one-vs-rest multi-label model.

pub mod ovr;
pub mod svc;

pub use ovr::{MultiLabelModel, MultiLabelTrainer};
pub use svc::{fit_binary, Separator, TrainerConfig};
