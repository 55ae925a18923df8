use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{ModuleView, QuizView, TutorView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", ModuleView)] Module {},
        #[route("/quiz", QuizView)] Quiz {},
        #[route("/tutor", TutorView)] Tutor {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Course" }
            ul {
                li { Link { to: Route::Module {}, "Notes" } }
                li { Link { to: Route::Quiz {}, "Quiz" } }
                li { Link { to: Route::Tutor {}, "AI Tutor" } }
            }
        }
    }
}
