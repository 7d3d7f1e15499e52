pub const DEFAULT_SIM_BASE_URL: &str = "https://api.sim.dune.com";

pub const PATH_TRANSACTIONS: &str = "/v1/evm/transactions";
pub const PATH_ACTIVITY: &str = "/v1/evm/activity";

pub const API_KEY_HEADER: &str = "X-Sim-Api-Key";

pub const PARAM_CHAIN_IDS: &str = "chain_ids";
pub const PARAM_OFFSET: &str = "offset";
pub const PARAM_LIMIT: &str = "limit";

/// Largest page the activity endpoint will return.
pub const ACTIVITY_PAGE_LIMIT: u32 = 100;

pub const FIELD_NEXT_OFFSET: &str = "next_offset";
pub const FIELD_TRANSACTIONS: &str = "transactions";
pub const FIELD_ACTIVITY: &str = "activity";

pub const ACTIVITY_TYPE_CALL: &str = "call";
pub const ACTIVITY_TYPE_APPROVE: &str = "approve";

pub const ASSET_TYPE_ERC20: &str = "erc20";
pub const ASSET_TYPE_ERC721: &str = "erc721";
pub const ASSET_TYPE_ERC1155: &str = "erc1155";
