use llmsweep::error::AppResult;

fn main() -> AppResult<()> {
    llmsweep::entry::run()
}
