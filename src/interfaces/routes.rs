use actix_web::web;

use crate::handlers::{
    assets::{static_dir_file, static_file},
    contact::submit_contact,
    home::{index, not_found},
    system::{health_check, public_config, stats},
};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index);

    cfg.service(
        web::scope("/api")
            .service(web::resource("/contact").route(web::post().to(submit_contact)))
            .service(health_check)
            .service(public_config)
            .service(stats),
    );

    cfg.service(web::resource("/static/{path:.*}").route(web::get().to(static_dir_file)));
    cfg.service(
        web::resource("/{filename:.*}")
            .route(web::get().to(static_file))
            .default_service(web::to(not_found)),
    );
}
