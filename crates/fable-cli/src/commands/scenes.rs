use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use fable_story::Sequencer;

pub fn run(config: Option<&Path>) -> Result<(), String> {
    let seq = Sequencer::new(super::load_config(config)?);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Id", "Title", "Instructions"]);
    for (index, definition) in seq.definitions().enumerate() {
        table.add_row(vec![
            index.to_string(),
            definition.id.to_string(),
            definition.title.to_string(),
            definition.instructions.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} scenes", seq.scene_count());
    Ok(())
}
