pub mod auth;
pub mod leads;
pub mod owners;
pub mod projects;
pub mod search;
pub mod units;
pub mod users;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── User routes ──
    cfg.service(
        web::resource("/users")
            .route(web::get().to(users::get_users))
            .route(web::post().to(users::create_user)),
    );
    // Registered before /users/{id} so "sales" is not parsed as an id.
    cfg.service(web::resource("/users/sales").route(web::get().to(users::get_sales_users)));
    cfg.service(
        web::resource("/users/{id}")
            .route(web::get().to(users::get_user))
            .route(web::put().to(users::update_user)),
    );

    // ── Project routes ──
    cfg.service(
        web::resource("/projects")
            .route(web::get().to(projects::get_projects))
            .route(web::post().to(projects::create_project)),
    );
    cfg.service(
        web::resource("/projects/{id}")
            .route(web::get().to(projects::get_project))
            .route(web::put().to(projects::update_project))
            .route(web::delete().to(projects::delete_project)),
    );

    // ── Unit routes ──
    cfg.service(
        web::resource("/units")
            .route(web::get().to(units::get_units))
            .route(web::post().to(units::create_unit)),
    );
    cfg.service(
        web::resource("/units/{id}")
            .route(web::get().to(units::get_unit))
            .route(web::put().to(units::update_unit))
            .route(web::delete().to(units::delete_unit)),
    );
    cfg.service(
        web::resource("/units/{id}/availability").route(web::put().to(units::set_availability)),
    );

    // ── Owner routes ──
    cfg.service(
        web::resource("/owners")
            .route(web::get().to(owners::get_owners))
            .route(web::post().to(owners::create_owner)),
    );
    cfg.service(web::resource("/owners/{id}").route(web::get().to(owners::get_owner)));

    // ── Lead routes: static paths first, then /leads/{id} ──
    cfg.service(
        web::scope("/leads")
            .route("", web::get().to(leads::get_leads))
            .route("", web::post().to(leads::create_lead))
            .route("/export.csv", web::get().to(leads::export_csv))
            .route("/summary", web::get().to(leads::get_summary))
            .route("/distribute", web::post().to(leads::distribute_leads))
            .route("/{id}", web::get().to(leads::get_lead))
            .route("/{id}", web::put().to(leads::update_lead))
            .route("/{id}", web::delete().to(leads::delete_lead))
            .route("/{id}/assign", web::post().to(leads::assign_lead))
            .route("/{id}/reassign", web::post().to(leads::reassign_lead))
            .route("/{id}/unassign", web::post().to(leads::unassign_lead))
            .route("/{id}/status", web::post().to(leads::change_status))
            .route("/{id}/follow-up", web::post().to(leads::follow_up))
            .route("/{id}/feedback", web::get().to(leads::get_feedback))
            .route("/{id}/history", web::get().to(leads::get_history)),
    );

    // ── Duplicate resolver ──
    cfg.service(
        web::scope("/search")
            .route("/client", web::get().to(search::search_client))
            .route("/owner", web::get().to(search::search_owner)),
    );
}
