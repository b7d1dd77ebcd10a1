const COMMANDS: &[&str] = &["share", "share_files"];

fn main() {
  tauri_plugin::Builder::new(COMMANDS).build();
}
