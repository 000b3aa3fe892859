use super::types::{Pool, PoolStatus, Token};
use num_bigint::BigUint;
use num_traits::ToPrimitive;

impl Pool {
    pub fn is_active(&self) -> bool {
        self.status == PoolStatus::Active
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.token0.address == token || self.token1.address == token
    }

    pub fn other_token(&self, token: &str) -> Option<&Token> {
        if self.token0.address == token {
            Some(&self.token1)
        } else if self.token1.address == token {
            Some(&self.token0)
        } else {
            None
        }
    }

    pub fn reserve_of(&self, token: &str) -> Option<&BigUint> {
        if self.token0.address == token {
            Some(&self.reserve0)
        } else if self.token1.address == token {
            Some(&self.reserve1)
        } else {
            None
        }
    }

    // (reserve_in, reserve_out) for a trade selling `token_in`
    pub fn reserves_for(&self, token_in: &str) -> Option<(&BigUint, &BigUint)> {
        if self.token0.address == token_in {
            Some((&self.reserve0, &self.reserve1))
        } else if self.token1.address == token_in {
            Some((&self.reserve1, &self.reserve0))
        } else {
            None
        }
    }

    /// Sum of both reserves. Only meaningful as a coarse liquidity gate.
    pub fn total_liquidity(&self) -> BigUint {
        &self.reserve0 + &self.reserve1
    }

    pub fn to_f64(value: &BigUint) -> f64 {
        value.to_f64().unwrap_or(f64::MAX)
    }
}
