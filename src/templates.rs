use handlebars::Handlebars;
use std::sync::Arc;

pub type Hbs = Arc<Handlebars<'static>>;

// Templates are compiled into the binary so the server and the tests do not
// depend on the working directory.
const TEMPLATES: &[(&str, &str)] = &[
    ("layouts/base", include_str!("../templates/layouts/base.hbs")),
    ("pages/not_found", include_str!("../templates/pages/not_found.hbs")),
    ("partials/alerts_list", include_str!("../templates/partials/alerts_list.hbs")),
    ("partials/alert_history", include_str!("../templates/partials/alert_history.hbs")),
    ("partials/watchlist", include_str!("../templates/partials/watchlist.hbs")),
    ("partials/prices", include_str!("../templates/partials/prices.hbs")),
    ("partials/quote", include_str!("../templates/partials/quote.hbs")),
    ("partials/monitor_status", include_str!("../templates/partials/monitor_status.hbs")),
];

pub fn build_handlebars() -> Hbs {
    let mut hb = Handlebars::new();
    hb.set_strict_mode(false);

    for (name, src) in TEMPLATES {
        hb.register_template_string(name, *src)
            .unwrap_or_else(|e| panic!("template {name}: {e}"));
    }

    Arc::new(hb)
}
