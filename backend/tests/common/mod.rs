#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use stock_forecast::external::price_provider::{PriceProvider, PriceProviderError};
use stock_forecast::models::PricePoint;
use stock_forecast::services::regressor::{RegressorError, SequenceRegressor, Window};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily points starting at `start` with the given closes.
pub fn daily_points(start: NaiveDate, closes: &[f64]) -> Vec<PricePoint> {
    start
        .iter_days()
        .zip(closes)
        .map(|(date, &close)| PricePoint { date, close })
        .collect()
}

pub fn ascending(n: usize) -> Vec<f64> {
    (1..=n).map(|i| i as f64).collect()
}

pub enum Tier {
    Points(Vec<PricePoint>),
    Fail(fn() -> PriceProviderError),
}

/// Scripted two-tier price source that counts its calls.
pub struct StubProvider {
    range: Tier,
    recent: Tier,
    pub range_calls: AtomicUsize,
    pub recent_calls: AtomicUsize,
    pub last_range: Mutex<Option<(NaiveDate, NaiveDate)>>,
}

impl StubProvider {
    pub fn new(range: Tier, recent: Tier) -> Self {
        Self {
            range,
            recent,
            range_calls: AtomicUsize::new(0),
            recent_calls: AtomicUsize::new(0),
            last_range: Mutex::new(None),
        }
    }

    pub fn with_range(points: Vec<PricePoint>) -> Self {
        Self::new(Tier::Points(points), Tier::Points(Vec::new()))
    }

    pub fn range_calls(&self) -> usize {
        self.range_calls.load(Ordering::SeqCst)
    }

    pub fn recent_calls(&self) -> usize {
        self.recent_calls.load(Ordering::SeqCst)
    }
}

fn answer(tier: &Tier) -> Result<Vec<PricePoint>, PriceProviderError> {
    match tier {
        Tier::Points(points) => Ok(points.clone()),
        Tier::Fail(make) => Err(make()),
    }
}

#[async_trait]
impl PriceProvider for StubProvider {
    async fn fetch_range(
        &self,
        _ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        self.range_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_range.lock().unwrap() = Some((start, end));
        answer(&self.range)
    }

    async fn fetch_recent(
        &self,
        _ticker: &str,
        _days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError> {
        self.recent_calls.fetch_add(1, Ordering::SeqCst);
        answer(&self.recent)
    }
}

/// Predicts the newest window value plus one.
pub struct LastPlusOne;

impl SequenceRegressor for LastPlusOne {
    fn predict_one(&self, window: &Window) -> Result<f64, RegressorError> {
        Ok(window.last() + 1.0)
    }
}

/// Repeats the newest window value.
pub struct Persistence;

impl SequenceRegressor for Persistence {
    fn predict_one(&self, window: &Window) -> Result<f64, RegressorError> {
        Ok(window.last())
    }
}

/// Returns a fixed value regardless of input.
pub struct Constant(pub f64);

impl SequenceRegressor for Constant {
    fn predict_one(&self, _window: &Window) -> Result<f64, RegressorError> {
        Ok(self.0)
    }
}

pub struct Broken;

impl SequenceRegressor for Broken {
    fn predict_one(&self, _window: &Window) -> Result<f64, RegressorError> {
        Err(RegressorError::Inference("session closed".into()))
    }
}
