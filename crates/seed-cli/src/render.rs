//! Plain-text output

use seed_core::ProvisionResult;
use seed_store::EntityType;
use std::collections::BTreeMap;

pub(crate) fn print_result(pass: u32, result: &ProvisionResult) {
    let status = if result.success { "OK" } else { "FAILED" };
    println!("Pass {pass}: {status}");
    println!("  {}", result.message);

    if let Some(reset) = result.flag("reset") {
        println!("  reset: {}", if reset { "done" } else { "aborted" });
    }

    if !result.stages.is_empty() {
        println!(
            "  {:<16} {:>8} {:>8} {:>8}",
            "stage", "created", "skipped", "failed"
        );
    }
    for report in &result.stages {
        println!(
            "  {:<16} {:>8} {:>8} {:>8}",
            report.stage.key(),
            report.succeeded,
            report.skipped,
            report.failed
        );
        for error in &report.errors {
            println!("    ! {error}");
        }
    }
    println!();
}

pub(crate) fn print_counts(counts: &BTreeMap<EntityType, usize>) {
    println!("Store contents:");
    for (entity, count) in counts {
        println!("  {:<16} {}", entity.table_name(), count);
    }
}
