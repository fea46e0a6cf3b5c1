use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use serde::Serialize;
use tracing::{debug, info};

use circlebox_core::{
    AppConfig, Controller, Heading, IntervalTimer, Layout, RecordingSurface, Tap, Tick,
};

/// One completed transition
#[derive(Debug, Serialize)]
struct Transition {
    tap: usize,
    position: usize,
    heading: Heading,
    ticks: u32,
    elapsed_ms: u64,
    /// Cursor position after settlement
    next: usize,
    reversed: bool,
}

#[derive(Debug, Serialize)]
struct FrameSummary {
    frames: u64,
    boxes: usize,
    arcs: usize,
    /// Settled value of every node after the last tap
    committed: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct Report {
    node_count: usize,
    tick_ms: u64,
    transitions: Vec<Transition>,
    final_frame: FrameSummary,
}

pub async fn run(config: &AppConfig, taps: usize, json: bool) -> Result<()> {
    let (timer, mut tick_rx) = IntervalTimer::new();
    let mut controller = Controller::new(config, timer)?;
    let layout = Layout::new(config.stage.width, config.stage.height, config)?;
    let mut surface = RecordingSurface::new();
    let mut frames = 0u64;

    info!(
        taps,
        nodes = config.chain.node_count,
        tick_ms = config.animation.tick_ms,
        "Starting simulation"
    );

    controller.draw(&mut surface, &layout);
    frames += 1;

    let mut transitions = Vec::with_capacity(taps);
    for tap in 1..=taps {
        let started = Instant::now();
        let Tap::Started { position, heading } = controller.tap() else {
            bail!("Tap {} was ignored: previous transition still running", tap);
        };

        // Redraw on begin, then after every applied tick
        surface.clear();
        controller.draw(&mut surface, &layout);
        frames += 1;

        let mut ticks = 0u32;
        let (next, reversed) = loop {
            let event = tick_rx
                .recv()
                .await
                .ok_or_else(|| anyhow!("Animation timer stopped unexpectedly"))?;
            let tick = controller.on_tick_event(event);

            if tick.needs_redraw() {
                ticks += 1;
                surface.clear();
                controller.draw(&mut surface, &layout);
                frames += 1;
            }

            if let Tick::Settled {
                current, reversed, ..
            } = tick
            {
                break (current, reversed);
            }
        };

        let transition = Transition {
            tap,
            position,
            heading,
            ticks,
            elapsed_ms: started.elapsed().as_millis() as u64,
            next,
            reversed,
        };
        debug!(?transition, "Transition finished");
        transitions.push(transition);
    }

    let committed = controller
        .chain()
        .iter()
        .map(|p| p.state().committed())
        .collect();
    let report = Report {
        node_count: controller.chain().len(),
        tick_ms: config.animation.tick_ms,
        transitions,
        final_frame: FrameSummary {
            frames,
            boxes: surface.stroke_rects().count(),
            arcs: surface.paths().count(),
            committed,
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &Report) {
    println!(
        "Simulated {} transitions over {} nodes ({} ms ticks):\n",
        report.transitions.len(),
        report.node_count,
        report.tick_ms
    );

    for t in &report.transitions {
        let heading = match t.heading {
            Heading::Forward => "grow",
            Heading::Reverse => "shrink",
        };
        let reversal = if t.reversed { " [end reached, reversing]" } else { "" };
        println!(
            "  #{:<3} node {} {:<6} {:>3} ticks {:>5} ms -> cursor {}{}",
            t.tap, t.position, heading, t.ticks, t.elapsed_ms, t.next, reversal
        );
    }

    let states: Vec<String> = report
        .final_frame
        .committed
        .iter()
        .map(|c| format!("{}", *c as u8))
        .collect();
    println!(
        "\nFinal frame: {} boxes, {} arcs, {} frames drawn",
        report.final_frame.boxes, report.final_frame.arcs, report.final_frame.frames
    );
    println!("Node states: [{}]", states.join(" "));
}
