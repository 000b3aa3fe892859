use thiserror::Error;

/// Failures while pricing a swap against a single pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("token {token} is not traded by pool {pool}")]
    UnknownToken { pool: String, token: String },

    #[error("pool {0} has a zero trade fee denominator")]
    ZeroFeeDenominator(String),

    #[error("pool {0} cannot cover the desired output")]
    InsufficientReserve(String),

    #[error("desired output must be non-zero")]
    ZeroOutput,
}

impl QuoteError {
    /// A malformed pool record is not a pruning condition and must reach the caller.
    pub fn is_malformed_pool(&self) -> bool {
        matches!(
            self,
            QuoteError::UnknownToken { .. } | QuoteError::ZeroFeeDenominator(_)
        )
    }
}

/// Request-level failures surfaced by path discovery.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    #[error("invalid token pair: {0}")]
    InvalidTokenPair(String),

    #[error("desired output amount must be positive")]
    NonPositiveAmount,

    #[error("chain id mismatch: request {requested}, graph {configured}")]
    ChainMismatch { requested: u64, configured: u64 },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("max hops {requested} exceeds the limit of {limit}")]
    MaxHopsTooLarge { requested: usize, limit: usize },

    #[error("slippage tolerance must be within [0, 100): {0}")]
    InvalidSlippage(f64),

    #[error("malformed pool: {0}")]
    MalformedPool(#[from] QuoteError),
}
