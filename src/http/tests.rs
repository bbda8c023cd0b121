use super::stream::{ChunkCounter, read_stream};
use super::test_server::{MockStream, closed_port_url, spawn_stream_server};
use super::*;
use crate::error::RequestFailure;
use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn endpoint(base: &str) -> Result<url::Url, String> {
    url::Url::parse(&format!("{}/v1/completions", base))
        .map_err(|err| format!("Invalid test endpoint: {}", err))
}

fn spec() -> RequestSpec {
    RequestSpec::new("test-model", "100 word story about balloons", 42)
}

#[test]
fn chunk_counter_handles_split_lines() -> Result<(), String> {
    let mut counter = ChunkCounter::default();
    let first = counter.feed(b"data: a");
    let second = counter.feed(b"bc\n\n  \r\ndata: ");
    let third = counter.feed(b"d\n");
    let tail = counter.feed(b"data: [DONE]");
    let flushed = counter.finish();

    if (first, second, third, tail, flushed) != (0, 1, 1, 0, 1) {
        return Err(format!(
            "Unexpected per-feed counts: {:?}",
            (first, second, third, tail, flushed)
        ));
    }
    if counter.count() != 3 {
        return Err(format!("Unexpected total: {}", counter.count()));
    }
    if counter.finish() != 0 {
        return Err("finish should be idempotent".to_owned());
    }
    Ok(())
}

#[test]
fn chunk_counter_ignores_blank_stream() -> Result<(), String> {
    let mut counter = ChunkCounter::default();
    counter.feed(b"\n\n \t\n\r\n");
    counter.finish();
    if counter.count() != 0 {
        return Err(format!("Expected no chunks, got {}", counter.count()));
    }
    Ok(())
}

#[test]
fn request_spec_wire_shape() -> Result<(), String> {
    let value = serde_json::to_value(spec()).map_err(|err| err.to_string())?;
    let expected = serde_json::json!({
        "model": "test-model",
        "prompt": "100 word story about balloons",
        "temperature": 0.0,
        "stream": true,
        "seed": 42
    });
    if value != expected {
        return Err(format!("Unexpected body: {}", value));
    }
    Ok(())
}

#[test]
fn draw_seeds_are_unique_and_in_range() -> Result<(), String> {
    let mut rng = rand::thread_rng();
    let seeds = draw_seeds(&mut rng, 500);
    let unique: BTreeSet<u64> = seeds.iter().copied().collect();
    if seeds.len() != 500 || unique.len() != 500 {
        return Err("Expected 500 distinct seeds".to_owned());
    }
    if seeds.iter().any(|seed| *seed == 0 || *seed > SEED_SPACE) {
        return Err("Seed out of range".to_owned());
    }
    Ok(())
}

#[test]
fn read_stream_times_sse_body() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stream_server(MockStream::sse(5)).await?;
        let client = reqwest::Client::new();
        let timing = read_stream(&client, &endpoint(&server.base_url)?, &spec())
            .await
            .map_err(|err| format!("Expected success, got {}", err))?;

        // five tokens plus the [DONE] sentinel
        if timing.chunk_count() != 6 {
            return Err(format!("Unexpected chunk count: {}", timing.chunk_count()));
        }
        if timing.ttft() > timing.total_time() {
            return Err("ttft exceeded total time".to_owned());
        }
        if timing.total_time().is_zero() || timing.tokens_per_second() <= 0.0 {
            return Err("Expected positive duration and tps".to_owned());
        }
        Ok(())
    })
}

#[test]
fn read_stream_reports_status_failure() -> Result<(), String> {
    run_async_test(async {
        let server =
            spawn_stream_server(MockStream::status("HTTP/1.1 503 Service Unavailable")).await?;
        let client = reqwest::Client::new();
        match read_stream(&client, &endpoint(&server.base_url)?, &spec()).await {
            Err(RequestFailure::Status { status: 503 }) => Ok(()),
            Err(err) => Err(format!("Unexpected failure: {}", err)),
            Ok(timing) => Err(format!("Expected failure, got {:?}", timing)),
        }
    })
}

#[test]
fn read_stream_reports_connection_failure() -> Result<(), String> {
    run_async_test(async {
        let base = closed_port_url().await?;
        let client = reqwest::Client::new();
        match read_stream(&client, &endpoint(&base)?, &spec()).await {
            Err(RequestFailure::Connection { .. }) => Ok(()),
            Err(err) => Err(format!("Unexpected failure: {}", err)),
            Ok(timing) => Err(format!("Expected failure, got {:?}", timing)),
        }
    })
}

#[test]
fn read_stream_times_out() -> Result<(), String> {
    run_async_test(async {
        let mut slow = MockStream::sse(3);
        slow.line_delay = Duration::from_millis(400);
        let server = spawn_stream_server(slow).await?;
        let factory =
            HttpSessionFactory::new(endpoint(&server.base_url)?, Some(Duration::from_millis(150)));
        let session = factory.open(1).map_err(|err| err.to_string())?;
        match session.stream_completion(&spec()).await {
            Err(RequestFailure::Timeout) => Ok(()),
            Err(err) => Err(format!("Unexpected failure: {}", err)),
            Ok(timing) => Err(format!("Expected timeout, got {:?}", timing)),
        }
    })
}

#[test]
fn empty_success_body_has_zero_ttft() -> Result<(), String> {
    run_async_test(async {
        let mut empty = MockStream::sse(0);
        empty.lines = vec!["\n\n".to_owned()];
        let server = spawn_stream_server(empty).await?;
        let client = reqwest::Client::new();
        let timing = read_stream(&client, &endpoint(&server.base_url)?, &spec())
            .await
            .map_err(|err| format!("Expected success, got {}", err))?;
        if timing.chunk_count() != 0 || !timing.ttft().is_zero() {
            return Err(format!("Unexpected timing: {:?}", timing));
        }
        Ok(())
    })
}
