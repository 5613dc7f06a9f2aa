use std::path::Path;

use colored::Colorize;
use fable_core::NodeKind;
use fable_core::tree::NodeSnapshot;
use fable_story::Sequencer;

pub fn run(
    config: Option<&Path>,
    index: i64,
    at_ms: u64,
    fallback: bool,
    json: bool,
) -> Result<(), String> {
    let mut seq = Sequencer::new(super::load_config(config)?);
    seq.set_non_ar_mode(fallback);
    seq.load_scene(index).map_err(|e| e.to_string())?;
    seq.run_for(at_ms).map_err(|e| e.to_string())?;

    let container = seq.active_container();
    log::debug!(
        "showing scene {index} at {} ms ({} nodes on stage)",
        seq.stage().now(),
        seq.stage().tree().len()
    );
    let snapshot = seq
        .stage()
        .tree()
        .snapshot(container)
        .ok_or("active container is missing")?;

    if json {
        let out = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| format!("serialization failed: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    let scene = seq.current_scene();
    println!(
        "  {} {}",
        scene.title.bold(),
        format!("(at {})", super::format_time(seq.stage().now())).dimmed()
    );
    println!("  {}", scene.instructions.italic());
    println!();
    for child in &snapshot.children {
        print_node(child, 1);
    }
    println!();
    println!("  {} nodes under {}", count(&snapshot) - 1, snapshot.name);
    Ok(())
}

fn print_node(node: &NodeSnapshot, depth: usize) {
    let p = node.transform.position;
    let detail = match &node.kind {
        NodeKind::Button { label } => format!(" [{label}]").green().to_string(),
        NodeKind::Text { value, .. } => format!(" \"{value}\""),
        _ => String::new(),
    };
    let marker = if node.interactive {
        " *".yellow().to_string()
    } else {
        String::new()
    };
    println!(
        "{}{} {}{detail}{marker} {}",
        "  ".repeat(depth),
        node.name,
        format!("({})", node.kind.tag()).dimmed(),
        format!("@ ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z).dimmed(),
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

fn count(node: &NodeSnapshot) -> usize {
    1 + node.children.iter().map(count).sum::<usize>()
}
