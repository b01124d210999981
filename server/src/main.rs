#[tokio::main]
async fn main() {
    workkerz::start_server().await;
}
