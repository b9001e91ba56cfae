pub mod admin;
pub mod create_pair;
pub mod curve;
pub mod deposit;
pub mod initialize;
pub mod swap;
pub mod swap_math;
pub mod views;
pub mod withdraw;
pub mod withdraw_fees;

// Only the account contexts (and the preview return type) are re-exported;
// handler functions stay module-qualified so they cannot shadow the
// entry points the `#[program]` macro generates from them.
pub use admin::AdminUpdate;
pub use create_pair::CreatePair;
pub use deposit::Deposit;
pub use initialize::Initialize;
pub use swap::Swap;
pub use views::PoolQuery;
pub use withdraw::{Withdraw, WithdrawPreview, WithdrawQuote};
pub use withdraw_fees::{ViewEarnedFees, WithdrawFees};

// The `#[program]` macro expects the `__client_accounts_*` modules that
// `#[derive(Accounts)]` generates to be reachable at the crate root.
pub(crate) use admin::__client_accounts_admin_update;
pub(crate) use create_pair::__client_accounts_create_pair;
pub(crate) use deposit::__client_accounts_deposit;
pub(crate) use initialize::__client_accounts_initialize;
pub(crate) use swap::__client_accounts_swap;
pub(crate) use views::__client_accounts_pool_query;
pub(crate) use withdraw::{__client_accounts_withdraw, __client_accounts_withdraw_preview};
pub(crate) use withdraw_fees::{__client_accounts_view_earned_fees, __client_accounts_withdraw_fees};
