mod chain;
mod status_bar;

pub use chain::ChainWidget;
pub use status_bar::StatusBarWidget;
