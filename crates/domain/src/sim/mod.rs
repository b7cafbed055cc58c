mod ledger;
mod sim_card;

pub use ledger::{
    TransferEvent, TransferKind, build_transfer_ledger, chronological, query_sim_history,
};
pub use sim_card::{normalize_sim, parse_sim, same_sim};
