#[actix_web::main]
async fn main() -> std::io::Result<()> {
    verdict_registry_lib::run().await
}
