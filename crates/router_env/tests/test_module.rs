use router_env::{instrument, logger, tracing, Tag};

#[instrument(skip_all)]
pub async fn fn_with_colon(val: i32) {
    let a = 13;
    let b = 31;

    logger::info!(tag = %Tag::General, a, b, val, "Hello from a function with colon");

    fn_without_colon(val).await;
}

#[instrument(fields(val3 = "abc"), skip_all)]
pub async fn fn_without_colon(val: i32) {
    let a = 13;
    let b = 31;

    logger::info!(tag = %Tag::CardTypeDetection, a, b, val);
}
