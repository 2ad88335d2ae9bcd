// Debounced promotion quotes against an in-process stub backend

mod common;

use axum::Json;
use axum::Router;
use axum::routing::post;
use common::{Hits, client, ok};
use mesa_client::{PromotionQuoter, QuoteOutcome};
use serde_json::{Value, json};
use shared::models::{CartLine, PromotionType};
use std::sync::Arc;
use std::time::Duration;

fn promotions_router(hits: Hits) -> Router {
    Router::new().route(
        "/api/v1/promotions/calculate",
        post(move |Json(body): Json<Value>| {
            let hits = hits.clone();
            async move {
                hits.bump();
                let subtotal: f64 = body["items"]
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .map(|i| {
                                i["quantity"].as_f64().unwrap_or(0.0)
                                    * i["unitPrice"].as_f64().unwrap_or(0.0)
                            })
                            .sum()
                    })
                    .unwrap_or(0.0);
                ok(json!({
                    "subtotal": subtotal,
                    "discount": 2.0,
                    "total": subtotal - 2.0,
                    "appliedPromotions": [
                        {"id": "p1", "name": "Happy hour", "type": "fixed_amount", "discount": 2.0}
                    ]
                }))
            }
        }),
    )
}

fn cart(quantity: u32) -> Vec<CartLine> {
    vec![CartLine {
        menu_item_id: "m1".into(),
        quantity,
        unit_price: 10.0,
    }]
}

#[tokio::test]
async fn newer_request_supersedes_pending_one() {
    let hits = Hits::default();
    let quoter = Arc::new(PromotionQuoter::with_debounce(
        client(promotions_router(hits.clone())),
        Duration::from_millis(100),
    ));

    let first = {
        let quoter = quoter.clone();
        tokio::spawn(async move { quoter.quote(&cart(1)).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = quoter.quote(&cart(2)).await.unwrap();

    assert_eq!(first.await.unwrap().unwrap(), QuoteOutcome::Superseded);
    match second {
        QuoteOutcome::Quote(quote) => {
            assert_eq!(quote.subtotal, 20.0);
            assert_eq!(quote.total, 18.0);
            assert_eq!(
                quote.applied_promotions[0].promotion_type,
                PromotionType::FixedAmount
            );
        }
        QuoteOutcome::Superseded => panic!("latest request must not be superseded"),
    }
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn repeated_cart_is_served_from_cache() {
    let hits = Hits::default();
    let quoter =
        PromotionQuoter::with_debounce(client(promotions_router(hits.clone())), Duration::ZERO);

    let first = quoter.quote(&cart(3)).await.unwrap();
    let second = quoter.quote(&cart(3)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(hits.count(), 1);
    assert_eq!(quoter.cached_len().await, 1);

    quoter.clear_cache().await;
    quoter.quote(&cart(3)).await.unwrap();
    assert_eq!(hits.count(), 2);
}
