use colored::Colorize;

pub fn handle_command(input: &str) -> Result<(), String> {
    match input.to_lowercase().as_str() {
        "help" => {
            println!("\n🍳 {}", "Smart Cook Commands:".bold());
            println!("  Just type your cooking question");
            println!("  Examples:");
            println!("    - how do I keep coconut milk from splitting?");
            println!("    - give me a weeknight nasi goreng recipe");
            println!("    - what goes into a basic sambal?");
            println!();

            println!("🥄 Kitchen Helpers (no model round-trip):");
            println!("  convert <value> <from> to <to>   - Convert units");
            println!("  Example: convert 2 cup to ml");
            println!("  scale <from> <to> <qty> [unit] <name>[; ...]  - Rescale servings");
            println!("  Example: scale 2 4 300 g rice; 2 egg");
            println!("  sub <ingredient>                 - Suggest a substitution");
            println!("  Example: sub palm sugar");
            println!();

            println!("📚 Knowledge Base:");
            println!("  kb    - List what the Smart Cook has notes on (retrieval mode)");
            println!();

            println!("⚙️ System Commands:");
            println!("  help  - Show this help menu");
            println!("  exit  - Exit the program");
            println!();
            Ok(())
        }
        "exit" | "quit" => {
            println!("\n👋 Sampai jumpa! Have fun trying new recipes!");
            std::process::exit(0);
        }
        _ => Err("Unknown system command. Type 'help' for available commands.".to_string()),
    }
}
