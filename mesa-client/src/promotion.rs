//! Promotion quotes with debounce and a bounded LRU cache

use shared::ApiResponse;
use shared::models::{CartLine, PromotionQuote, PromotionQuoteRequest};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::time::Duration;

use crate::error::ClientResult;
use crate::http::HttpClient;

pub const PROMOTIONS_CALCULATE_PATH: &str = "/api/v1/promotions/calculate";

/// Debounce window for quote requests
const DEBOUNCE_MS: u64 = 500;
/// Cached quotes kept
pub const QUOTE_CACHE_CAPACITY: usize = 50;

/// Result of a debounced quote call
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
    Quote(PromotionQuote),
    /// A newer request arrived during the debounce window
    Superseded,
}

/// Least-recently-used map of cart key to quote
#[derive(Debug)]
pub struct QuoteCache {
    capacity: usize,
    entries: HashMap<String, PromotionQuote>,
    order: VecDeque<String>,
}

impl QuoteCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&mut self, key: &str) -> Option<PromotionQuote> {
        let quote = self.entries.get(key)?.clone();
        self.touch(key);
        Some(quote)
    }

    pub fn put(&mut self, key: String, quote: PromotionQuote) {
        if self.entries.insert(key.clone(), quote).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key)
            && let Some(k) = self.order.remove(pos)
        {
            self.order.push_back(k);
        }
    }
}

/// Cache key for a cart: lines merged per menu item, sorted, prices at 2dp
pub fn cart_key(items: &[CartLine]) -> String {
    let mut merged: BTreeMap<(&str, String), u32> = BTreeMap::new();
    for line in items.iter().filter(|l| l.quantity > 0) {
        let price = format!("{:.2}", line.unit_price);
        *merged
            .entry((line.menu_item_id.as_str(), price))
            .or_default() += line.quantity;
    }
    merged
        .into_iter()
        .map(|((id, price), qty)| format!("{}x{}@{}", id, qty, price))
        .collect::<Vec<_>>()
        .join("|")
}

/// Debounced promotion quoting
pub struct PromotionQuoter<C> {
    http: Arc<C>,
    debounce: Duration,
    generation: AtomicU64,
    cache: Mutex<QuoteCache>,
}

impl<C: HttpClient> PromotionQuoter<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self::with_debounce(http, Duration::from_millis(DEBOUNCE_MS))
    }

    pub fn with_debounce(http: Arc<C>, debounce: Duration) -> Self {
        Self {
            http,
            debounce,
            generation: AtomicU64::new(0),
            cache: Mutex::new(QuoteCache::new(QUOTE_CACHE_CAPACITY)),
        }
    }

    /// Quote a cart
    ///
    /// Cached carts answer immediately. Otherwise the call waits out the
    /// debounce window and resolves to [`QuoteOutcome::Superseded`] if a
    /// newer call was made meanwhile.
    pub async fn quote(&self, items: &[CartLine]) -> ClientResult<QuoteOutcome> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let key = cart_key(items);

        if let Some(hit) = self.cache.lock().await.get(&key) {
            tracing::trace!(key = %key, "Promotion quote cache hit");
            return Ok(QuoteOutcome::Quote(hit));
        }

        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::trace!(ticket, "Promotion quote superseded");
            return Ok(QuoteOutcome::Superseded);
        }

        let request = PromotionQuoteRequest {
            items: items.to_vec(),
        };
        let quote = self
            .http
            .post::<ApiResponse<PromotionQuote>, _>(PROMOTIONS_CALCULATE_PATH, &request)
            .await?
            .into_result()?;

        tracing::debug!(
            subtotal = quote.subtotal,
            discount = quote.discount,
            promotions = quote.applied_promotions.len(),
            "Promotion quote fetched"
        );
        self.cache.lock().await.put(key, quote.clone());
        Ok(QuoteOutcome::Quote(quote))
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn clear_cache(&self) {
        *self.cache.lock().await = QuoteCache::new(QUOTE_CACHE_CAPACITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(total: f64) -> PromotionQuote {
        PromotionQuote {
            subtotal: total,
            discount: 0.0,
            total,
            applied_promotions: Vec::new(),
        }
    }

    fn line(id: &str, quantity: u32, price: f64) -> CartLine {
        CartLine {
            menu_item_id: id.to_string(),
            quantity,
            unit_price: price,
        }
    }

    #[test]
    fn test_evicts_oldest_beyond_capacity() {
        let mut cache = QuoteCache::new(QUOTE_CACHE_CAPACITY);
        for i in 0..=QUOTE_CACHE_CAPACITY {
            cache.put(format!("cart-{}", i), quote(i as f64));
        }
        assert_eq!(cache.len(), QUOTE_CACHE_CAPACITY);
        assert!(!cache.contains("cart-0"));
        assert!(cache.contains("cart-1"));
        assert!(cache.contains(&format!("cart-{}", QUOTE_CACHE_CAPACITY)));
    }

    #[test]
    fn test_get_refreshes_recency() {
        let mut cache = QuoteCache::new(2);
        cache.put("a".into(), quote(1.0));
        cache.put("b".into(), quote(2.0));
        assert!(cache.get("a").is_some());
        cache.put("c".into(), quote(3.0));
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn test_put_existing_key_replaces_without_growing() {
        let mut cache = QuoteCache::new(2);
        cache.put("a".into(), quote(1.0));
        cache.put("a".into(), quote(5.0));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").unwrap().total, 5.0);
    }

    #[test]
    fn test_cart_key_is_order_independent() {
        let a = cart_key(&[line("m2", 1, 5.0), line("m1", 2, 10.0)]);
        let b = cart_key(&[line("m1", 1, 10.0), line("m2", 1, 5.0), line("m1", 1, 10.0)]);
        assert_eq!(a, b);
        assert_eq!(a, "m1x2@10.00|m2x1@5.00");
    }

    #[test]
    fn test_cart_key_ignores_empty_lines() {
        assert_eq!(
            cart_key(&[line("m1", 0, 3.0), line("m2", 1, 4.0)]),
            "m2x1@4.00"
        );
    }
}
