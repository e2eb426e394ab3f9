use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use std::time::Duration;

use crate::chat::ChatSession;
use crate::tools::convert::{convert_units, is_known_unit};
use crate::tools::scale::{scale_portions, IngredientLine};
use crate::tools::substitute::{known_ingredients, substitute_ingredient};

mod system;

const THINKING_LINES: &[&str] = &[
    "Smart Cook is stirring the pot...",
    "Tasting for seasoning...",
    "Checking the pantry...",
    "Letting it simmer...",
];

pub struct CommandHandler {
    session: ChatSession,
}

impl CommandHandler {
    pub fn new(session: ChatSession) -> Self {
        Self { session }
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<(), String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(());
        }

        match input.to_lowercase().as_str() {
            "help" | "exit" | "quit" => return system::handle_command(input),
            "kb" => return self.list_knowledge(),
            _ => {}
        }

        if let Some(rest) = input.strip_prefix("convert ") {
            return Self::handle_convert(rest);
        }
        if let Some(rest) = input.strip_prefix("scale ") {
            return Self::handle_scale(rest);
        }
        if let Some(rest) = input
            .strip_prefix("substitute ")
            .or_else(|| input.strip_prefix("sub "))
        {
            return Self::handle_substitute(rest);
        }

        self.handle_chat(input).await
    }

    fn list_knowledge(&self) -> Result<(), String> {
        match self.session.knowledge_titles() {
            Some(titles) => {
                println!("\n📚 The Smart Cook has notes on:");
                for title in titles {
                    println!("  • {}", title);
                }
                println!();
                Ok(())
            }
            None => Err(
                "Knowledge base is only loaded in retrieval mode. Restart with --rag.".to_string(),
            ),
        }
    }

    /// `convert 2 cup to ml` (the "to" is optional).
    fn handle_convert(rest: &str) -> Result<(), String> {
        let tokens: Vec<&str> = rest
            .split_whitespace()
            .filter(|t| !t.eq_ignore_ascii_case("to"))
            .collect();
        let (value, from, to) = match tokens.as_slice() {
            [value, from, to] => (*value, *from, *to),
            _ => return Err("Usage: convert <value> <from> to <to>".to_string()),
        };

        let value: f64 = value
            .parse()
            .map_err(|_| format!("Not a number: {}", value))?;
        let converted = convert_units(value, from, to).map_err(|e| e.to_string())?;

        println!(
            "🥄 {} {} = {} {}",
            value,
            from,
            format!("{:.2}", converted).cyan(),
            to
        );
        Ok(())
    }

    /// `scale <from> <to> <qty> [unit] <name>[; <qty> [unit] <name>]...`
    fn handle_scale(rest: &str) -> Result<(), String> {
        let mut parts = rest.splitn(3, ' ');
        let usage = "Usage: scale <servings-from> <servings-to> <qty> [unit] <name>[; ...]";

        let servings_from: f64 = parts
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or(usage.to_string())?;
        let servings_to: f64 = parts
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or(usage.to_string())?;
        let ingredient_list = parts.next().ok_or(usage.to_string())?;

        let mut ingredients = Vec::new();
        for segment in ingredient_list.split(';') {
            let tokens: Vec<&str> = segment.split_whitespace().collect();
            if tokens.len() < 2 {
                return Err(format!("Cannot parse ingredient: '{}'. {}", segment.trim(), usage));
            }
            let quantity: f64 = tokens[0]
                .parse()
                .map_err(|_| format!("Not a quantity: {}", tokens[0]))?;

            // The second token is a unit only if we recognize it; otherwise
            // it is the start of the ingredient name ("2 egg").
            let (unit, name_tokens) = if tokens.len() > 2 && is_known_unit(tokens[1]) {
                (Some(tokens[1].to_string()), &tokens[2..])
            } else {
                (None, &tokens[1..])
            };

            ingredients.push(IngredientLine {
                name: name_tokens.join(" "),
                quantity,
                unit,
            });
        }

        let scaled = scale_portions(servings_from, servings_to, &ingredients)
            .map_err(|e| e.to_string())?;

        println!(
            "\n🍽️ For {} servings (was {}):",
            servings_to.to_string().cyan(),
            servings_from
        );
        for line in scaled {
            match line.unit {
                Some(unit) => println!("  • {:.2} {} {}", line.quantity, unit, line.name),
                None => println!("  • {:.2} {}", line.quantity, line.name),
            }
        }
        println!();
        Ok(())
    }

    fn handle_substitute(rest: &str) -> Result<(), String> {
        let ingredient = rest.trim();
        if ingredient.is_empty() {
            return Err("Usage: sub <ingredient>".to_string());
        }

        match substitute_ingredient(ingredient) {
            Some(suggestion) => {
                println!("🔁 Instead of {}: {}", ingredient.cyan(), suggestion);
                Ok(())
            }
            None => {
                println!(
                    "🤷 No substitution on file for '{}'. I know about: {}",
                    ingredient,
                    known_ingredients().join(", ")
                );
                Ok(())
            }
        }
    }

    async fn handle_chat(&mut self, input: &str) -> Result<(), String> {
        let input_tokens = input.split_whitespace().count();

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        let line = THINKING_LINES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(THINKING_LINES[0]);
        spinner.set_message(line);
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.session.turn(input).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => {
                let response_tokens = response.split_whitespace().count();
                self.print_response(&response, input_tokens, response_tokens);
                Ok(())
            }
            Err(e) => Err(format!("Failed to get a response: {}", e)),
        }
    }

    fn print_response(&self, response: &str, input_tokens: usize, response_tokens: usize) {
        println!("\n🍳 {}", "Smart Cook:".bold());
        println!("{}", response.truecolor(255, 236, 179));

        println!(
            "\n📊 Tokens: 📥 Input: {} | 📤 Response: {} | 📈 Total: {}",
            input_tokens.to_string().cyan(),
            response_tokens.to_string().cyan(),
            (input_tokens + response_tokens).to_string().cyan()
        );
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_command_happy_path() {
        assert!(CommandHandler::handle_convert("2 cup to ml").is_ok());
        assert!(CommandHandler::handle_convert("180 c f").is_ok());
    }

    #[test]
    fn test_convert_command_rejects_garbage() {
        assert!(CommandHandler::handle_convert("two cup to ml").is_err());
        assert!(CommandHandler::handle_convert("2 cup").is_err());
        assert!(CommandHandler::handle_convert("2 cup to grams").is_err());
    }

    #[test]
    fn test_scale_command_parses_units_and_bare_names() {
        assert!(CommandHandler::handle_scale("2 4 300 g rice; 2 egg").is_ok());
    }

    #[test]
    fn test_scale_command_usage_errors() {
        assert!(CommandHandler::handle_scale("2").is_err());
        assert!(CommandHandler::handle_scale("2 4 rice").is_err());
        assert!(CommandHandler::handle_scale("0 4 300 g rice").is_err());
    }

    #[test]
    fn test_substitute_command_never_fails_on_unknowns() {
        assert!(CommandHandler::handle_substitute("fish sauce").is_ok());
        assert!(CommandHandler::handle_substitute("mystery meat").is_ok());
        assert!(CommandHandler::handle_substitute("  ").is_err());
    }
}
