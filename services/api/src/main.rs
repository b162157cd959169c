#[tokio::main]
async fn main() {
    if let Err(err) = hostel_desk_api::run().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
