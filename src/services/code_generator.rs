//! Referral code generation
//!
//! Codes are `PREFIX[-INITIALS]-DDDD`, uppercased. The prefix is used exactly
//! as configured, so the default `REF-` yields `REF--ANN-0427` and `REF` yields
//! `REF-ANN-0427`. The existence check here only skips obvious collisions; the
//! unique index on `referral_codes.code` is what actually guarantees
//! uniqueness (see `ledger::issue`).

use async_trait::async_trait;
use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::error::Result;
use crate::models::prelude::*;
use crate::models::referral_code;
use crate::services::failure::ReferralFailure;

/// Number of random digits at the end of every code
pub const SUFFIX_DIGITS: usize = 4;

const SUFFIX_SPACE: u16 = 10_000;
const MAX_INITIALS: usize = 3;

/// Up to three letters from the first word of a customer's name, uppercased
pub fn customer_initials(customer_name: Option<&str>) -> Option<String> {
    let first = customer_name?.split_whitespace().next()?;
    let initials: String = first
        .chars()
        .filter(|c| c.is_alphabetic())
        .take(MAX_INITIALS)
        .collect::<String>()
        .to_uppercase();

    if initials.is_empty() {
        None
    } else {
        Some(initials)
    }
}

/// Draw a uniformly random suffix in `0..10000`
pub fn random_suffix<R: Rng>(rng: &mut R) -> u16 {
    rng.random_range(0..SUFFIX_SPACE)
}

/// Append `-INITIALS` (when known) and `-DDDD` to the prefix, uppercased
pub fn compose_code(prefix: &str, initials: Option<&str>, suffix: u16) -> String {
    let mut code = String::from(prefix);
    if let Some(initials) = initials.filter(|i| !i.is_empty()) {
        code.push('-');
        code.push_str(initials);
    }
    code.push_str(&format!("-{:0width$}", suffix, width = SUFFIX_DIGITS));
    code.to_uppercase()
}

/// Whether a code string is already stored
pub async fn code_exists<C: ConnectionTrait>(db: &C, code: &str) -> Result<bool> {
    let count = ReferralCode::find()
        .filter(referral_code::Column::Code.eq(code))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Supplies candidate code strings to `ledger::issue`.
///
/// Every call to `propose` is one generation attempt and counts against the
/// caller's attempt budget.
#[async_trait]
pub trait CodeSource: Send {
    /// Next candidate, or `None` when the drawn code is already taken
    async fn propose<C: ConnectionTrait>(&mut self, db: &C) -> Result<Option<String>>;
}

/// Random suffixes under a fixed prefix and customer initials
pub struct RandomCodes<'a, R> {
    prefix: &'a str,
    initials: Option<String>,
    rng: &'a mut R,
}

impl<'a, R: Rng + Send> RandomCodes<'a, R> {
    pub fn new(prefix: &'a str, customer_name: Option<&str>, rng: &'a mut R) -> Self {
        Self {
            prefix,
            initials: customer_initials(customer_name),
            rng,
        }
    }
}

#[async_trait]
impl<'a, R: Rng + Send> CodeSource for RandomCodes<'a, R> {
    async fn propose<C: ConnectionTrait>(&mut self, db: &C) -> Result<Option<String>> {
        let suffix = random_suffix(self.rng);
        let candidate = compose_code(self.prefix, self.initials.as_deref(), suffix);

        if code_exists(db, &candidate).await? {
            tracing::debug!("Referral code {} taken", candidate);
            return Ok(None);
        }
        Ok(Some(candidate))
    }
}

/// Produce a code string not currently present in the store.
///
/// Resamples only the numeric suffix; gives up with `DUPLICATE_CODE` after
/// `max_attempts` collisions.
pub async fn generate_unique_code<C, R>(
    db: &C,
    prefix: &str,
    customer_name: Option<&str>,
    rng: &mut R,
    max_attempts: u32,
) -> Result<String>
where
    C: ConnectionTrait,
    R: Rng + Send,
{
    let mut source = RandomCodes::new(prefix, customer_name, rng);

    for _ in 0..max_attempts.max(1) {
        if let Some(code) = source.propose(db).await? {
            return Ok(code);
        }
    }

    tracing::warn!(
        "Gave up generating a referral code for prefix '{}' after {} attempts",
        prefix,
        max_attempts
    );
    Err(ReferralFailure::DuplicateCode.into())
}
