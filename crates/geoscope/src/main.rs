#[tokio::main]
async fn main() {
    if let Err(e) = lib_geoscope::init().await {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
