pub mod chat;
pub mod retrieval;

use actix_web::web;

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/retrieval").configure(retrieval::create_routes))
        .service(web::scope("/chat").configure(chat::create_routes));
}
