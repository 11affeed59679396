//! Synthetic product generation.
//!
//! Every value is drawn from the synthesizer's own RNG. Product codes go
//! through a [`UniquePool`] owned by the synthesizer, so two records built by
//! the same instance never share a code. Nothing is shared between
//! instances: a fresh synthesizer starts with an empty pool.

mod catalog;

use crate::error::SynthError;
use crate::product::Product;
use chrono::{Datelike, Days, Local, NaiveDate};
use fake::faker::address::en::CountryCode;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{DomainSuffix, Username};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::info;

/// Draws allowed per unique value before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Tracks values already handed out and rejects repeats.
#[derive(Debug)]
pub struct UniquePool {
    seen: HashSet<String>,
    max_attempts: usize,
}

impl UniquePool {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            seen: HashSet::new(),
            max_attempts,
        }
    }

    /// Call `draw` until it yields a value not seen before.
    pub fn draw(&mut self, mut draw: impl FnMut() -> String) -> Result<String, SynthError> {
        for _ in 0..self.max_attempts {
            let value = draw();
            if !self.seen.contains(&value) {
                self.seen.insert(value.clone());
                return Ok(value);
            }
        }

        Err(SynthError::UniquenessExhausted {
            attempts: self.max_attempts,
        })
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl Default for UniquePool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Builds [`Product`] records.
pub struct ProductSynthesizer<R = StdRng> {
    rng: R,
    codes: UniquePool,
    today: NaiveDate,
    trace: bool,
}

impl ProductSynthesizer<StdRng> {
    /// A synthesizer seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A synthesizer that produces the same sequence for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for ProductSynthesizer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ProductSynthesizer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            codes: UniquePool::default(),
            today: Local::now().date_naive(),
            trace: false,
        }
    }

    /// Log every generated record at info level.
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Pin "today", which bounds `creation_date`.
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn product(&mut self) -> Result<Product, SynthError> {
        let rng = &mut self.rng;
        let code = self.codes.draw(|| ean13(rng))?;

        let company: String = CompanyName().fake_with_rng(&mut self.rng);
        let company_email = company_email(&mut self.rng, &company);

        let product = Product {
            code,
            name: catalog::product_name(&mut self.rng),
            description: Sentence(4..10).fake_with_rng(&mut self.rng),
            price: price(&mut self.rng),
            category: catalog::pick(&mut self.rng, catalog::CATEGORIES).to_string(),
            stock: self.rng.gen_range(0..=10_000),
            creation_date: date_this_year(&mut self.rng, self.today),
            company,
            company_email,
            origin_country: CountryCode().fake_with_rng(&mut self.rng),
        };

        if self.trace {
            info!(?product, "generated product");
        }

        Ok(product)
    }

    /// Exactly `count` products with pairwise distinct codes.
    pub fn products(&mut self, count: usize) -> Result<Vec<Product>, SynthError> {
        (0..count).map(|_| self.product()).collect()
    }
}

/// Twelve random digits followed by the EAN-13 check digit.
fn ean13<R: Rng + ?Sized>(rng: &mut R) -> String {
    let digits: Vec<u32> = (0..12).map(|_| rng.gen_range(0..10)).collect();
    let mut code: String = digits
        .iter()
        .filter_map(|d| char::from_digit(*d, 10))
        .collect();
    code.extend(char::from_digit(ean_check_digit(&digits), 10));
    code
}

fn ean_check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();
    (10 - sum % 10) % 10
}

fn price<R: Rng + ?Sized>(rng: &mut R) -> Decimal {
    Decimal::new(rng.gen_range(1_000..100_000), 2)
}

/// Uniform between January 1st of `today`'s year and `today`.
fn date_this_year<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    let back = rng.gen_range(0..=today.ordinal0());
    today
        .checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(today)
}

fn company_email<R: Rng + ?Sized>(rng: &mut R, company: &str) -> String {
    let user: String = Username().fake_with_rng(rng);
    let suffix: String = DomainSuffix().fake_with_rng(rng);
    let domain = company
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    let domain = if domain.is_empty() {
        "example".to_string()
    } else {
        domain
    };

    let user: String = user
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_'))
        .map(|c| c.to_ascii_lowercase())
        .collect();

    format!("{user}@{domain}.{suffix}")
}
