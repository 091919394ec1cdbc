//! # report 模块
//!
//! 汇总抓取结果并对外输出：
//!
//! - [`build`]：由结果列表和计数快照生成最终报告；
//! - [`save`]：报告落盘为带时间戳的 JSON 文件；
//! - [`print_summary`]：按固定格式打印性能达标情况与逐场明细。
//!
//! 落盘失败不影响内存中的报告，由调用方决定如何记录。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::model::{EventResult, ScrapeReport, StatsSnapshot};

/// 由结果列表和计数快照生成报告。
///
/// 总耗时按逐条耗时累加（沿用既有口径），平均耗时与失败率在
/// 输入为空时均为 0，不会出现除零。
pub fn build(events: Vec<EventResult>, stats: &StatsSnapshot) -> ScrapeReport {
    let total_execution_time: f64 = events.iter().map(|e| e.scrape_duration).sum();
    let average_time_per_event = if events.is_empty() {
        0.0
    } else {
        total_execution_time / events.len() as f64
    };

    ScrapeReport {
        scrape_timestamp: Utc::now(),
        total_events: events.len(),
        total_attempts: stats.total_attempts,
        failed_attempts: stats.failed_attempts,
        failure_rate: stats.failure_rate(),
        total_execution_time,
        average_time_per_event,
        events,
    }
}

/// 将报告写入 `output_dir/scrape_results_{时间戳}.json`。
pub fn save(report: &ScrapeReport, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let filename = format!(
        "scrape_results_{}.json",
        report.scrape_timestamp.format("%Y%m%d_%H%M%S")
    );
    let path = output_dir.join(filename);
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    info!("报告文件：{}", path.display());
    Ok(path)
}

/// 打印控制台摘要：三项固定达标判定 + 统计数字 + 逐场明细。
pub fn print_summary(report: &ScrapeReport) {
    if report.events.is_empty() {
        println!("No results to process");
        return;
    }

    println!("\n{}", "=".repeat(50));
    println!("TICKET SCRAPER RESULTS");
    println!("{}", "=".repeat(50));

    println!("\nPERFORMANCE CRITERIA:");
    println!(
        "1. Average scrape time per event: {:.2} seconds",
        report.average_time_per_event
    );
    println!("   Required: < 2 seconds");
    println!(
        "   Status: {}",
        if report.average_time_per_event < 2.0 { "✓ PASS" } else { "✗ FAIL" }
    );

    println!("\n2. Failed attempts: {}", report.failed_attempts);
    println!("   Required: 0");
    println!(
        "   Status: {}",
        if report.failed_attempts == 0 { "✓ PASS" } else { "✗ FAIL" }
    );

    println!("\n3. Failure rate: {:.2}%", report.failure_rate);
    println!("   Required: < 15%");
    println!(
        "   Status: {}",
        if report.failure_rate < 15.0 { "✓ PASS" } else { "✗ FAIL" }
    );

    println!("\nSCRAPING STATISTICS:");
    println!("- Total events found: {}", report.total_events);
    println!("- Total scraping attempts: {}", report.total_attempts);
    println!("- Failed attempts: {}", report.failed_attempts);
    println!(
        "- Total execution time: {:.2} seconds",
        report.total_execution_time
    );

    println!("\nEVENT DETAILS:");
    for result in &report.events {
        println!("\nEvent: {}", result.event_name);
        println!("- ID: {}", result.event_id);
        println!("- Date: {}", result.event_date);
        println!("- Venue: {}", result.venue);
        println!("- Number of ticket zones: {}", result.zone_count());
        println!("- Processing time: {:.2} seconds", result.scrape_duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(id: i64, duration: f64) -> EventResult {
        EventResult {
            event_id: id,
            event_name: format!("Event {}", id),
            event_date: "2025-01-26T19:00:00".to_string(),
            venue: "Test Arena".to_string(),
            category_id: Some(1),
            tickets: json!({ "zones": [{}] }),
            scrape_duration: duration,
        }
    }

    #[test]
    fn test_build_empty_input_yields_zeros() {
        let stats = StatsSnapshot {
            total_attempts: 0,
            failed_attempts: 0,
        };
        let report = build(Vec::new(), &stats);

        assert_eq!(report.total_events, 0);
        assert_eq!(report.failure_rate, 0.0);
        assert_eq!(report.average_time_per_event, 0.0);
        assert_eq!(report.total_execution_time, 0.0);
    }

    #[test]
    fn test_build_aggregates_durations() {
        let stats = StatsSnapshot {
            total_attempts: 5,
            failed_attempts: 1,
        };
        let report = build(vec![result(1, 1.0), result(2, 2.0), result(3, 3.0)], &stats);

        assert_eq!(report.total_events, 3);
        assert_eq!(report.total_execution_time, 6.0);
        assert_eq!(report.average_time_per_event, 2.0);
        assert_eq!(report.failure_rate, 20.0);
    }

    #[test]
    fn test_build_idempotent_except_timestamp() {
        let stats = StatsSnapshot {
            total_attempts: 2,
            failed_attempts: 0,
        };
        let events = vec![result(1, 0.5), result(2, 1.5)];

        let a = build(events.clone(), &stats);
        let b = build(events, &stats);

        let mut a = serde_json::to_value(&a).unwrap();
        let mut b = serde_json::to_value(&b).unwrap();
        a.as_object_mut().unwrap().remove("scrape_timestamp");
        b.as_object_mut().unwrap().remove("scrape_timestamp");
        assert_eq!(a, b);
    }

    #[test]
    fn test_save_writes_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let stats = StatsSnapshot {
            total_attempts: 1,
            failed_attempts: 0,
        };
        let report = build(vec![result(1, 0.8)], &stats);

        let path = save(&report, dir.path()).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("scrape_results_"));

        let loaded: ScrapeReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.total_events, 1);
        assert_eq!(loaded.events[0].event_id, 1);
        assert_eq!(loaded.events[0].scrape_duration, 0.8);
    }
}
