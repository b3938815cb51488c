//! A simulated application loop instrumented with framescope.
//!
//! Runs a handful of frames with nested busy-work regions, then prints the
//! nested and flat reports for the most recent frame.

use std::{thread, time::Duration};

use tracing_subscriber::EnvFilter;

use framescope::{FlatSortMode, Profiler, ProfilerConfig, ReportLine, ReportTree};

fn simulate_physics(profiler: &Profiler) {
    let _scope = profiler.scope("physics");
    {
        let _scope = profiler.scope("integrate");
        thread::sleep(Duration::from_millis(2));
    }
    {
        let _scope = profiler.scope("collide");
        thread::sleep(Duration::from_millis(1));
    }
}

fn simulate_render(profiler: &Profiler) {
    let _scope = profiler.scope("render");
    for _ in 0..2 {
        let _pass = profiler.scope("draw_pass");
        thread::sleep(Duration::from_millis(1));
    }
}

fn print_rows(title: &str, rows: &[ReportLine]) {
    println!("\n{title}");
    println!(
        "{:<40} {:>6} {:>8} {:>12} {:>8} {:>12}",
        "FUNCTION NAME", "CALLS", "TOTAL%", "TOTAL TIME", "SELF%", "SELF TIME"
    );
    for row in rows {
        let name = format!("{}{}", "  ".repeat(row.indent), row.name);
        println!(
            "{:<40} {:>6} {:>8} {:>12} {:>8} {:>12}",
            name,
            row.call_count,
            row.total_time_percent.to_string(),
            row.total_time.to_string(),
            row.self_time_percent.to_string(),
            row.self_time.to_string(),
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let profiler = Profiler::new(ProfilerConfig::default());

    for _ in 0..5 {
        profiler.begin_frame();
        {
            let _update = profiler.scope("update");
            simulate_physics(&profiler);
        }
        simulate_render(&profiler);
        profiler.end_frame();
    }

    println!(
        "recorded {} of up to {} frames (frame #{} newest)",
        profiler.history_len(),
        profiler.history_capacity(),
        profiler.frame_number(),
    );

    let frame = match profiler.previous_frame(0) {
        Ok(frame) => frame,
        Err(err) => {
            eprintln!("no frame available: {err}");
            return;
        }
    };

    let report = ReportTree::build(&frame);
    print_rows("NESTED REPORT", &report.nested_report());
    print_rows(
        "FLAT REPORT (by self time)",
        &report.flat_report(FlatSortMode::SelfTime),
    );
}
