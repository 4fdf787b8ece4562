//! rAttendance main entrypoint.

use rattendance::run;
use rattendance::ui::messages::error;

fn main() {
    println!();
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        if e.is_storage() {
            error("The action did not complete.");
        }
        std::process::exit(1);
    }
}
