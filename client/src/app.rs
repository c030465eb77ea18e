//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use memberhub::backend::ContentBackend;
use memberhub::backend::supabase::SupabaseClient;
use memberhub::{
    AccessGate, AuthState, InFlightGuard, KeyValueStore, Navigator, RedirectStore, RouteTable, SessionManager, SiteRoutes,
};

use crate::components::nav_bar::NavBar;
use crate::components::notice_bar::NoticeBar;
use crate::components::protected_route::ProtectedRoute;
use crate::pages::{
    account::AccountPage, home::HomePage, reset_password::ResetPasswordPage, sign_in::SignInPage,
    subscription::SubscriptionPage, videos::VideosPage,
};
use crate::state::notice::NoticeState;
use crate::util::navigation::{NavigationBridge, RouteState, SignalNavigator};
use crate::util::{config, storage};

/// Core services shared through context. Built once per app shell.
#[derive(Clone)]
pub struct Services {
    pub session: Arc<SessionManager>,
    pub gate: AccessGate,
    pub content: Arc<dyn ContentBackend>,
    pub store: Arc<dyn KeyValueStore>,
    /// One in-flight guard for every like and comment widget on the page.
    pub mutations: InFlightGuard,
}

fn build_services(navigator: SignalNavigator) -> Result<Services, String> {
    let config = config::load().map_err(|e| e.to_string())?;
    let store = storage::browser_or_memory();
    let client = Arc::new(SupabaseClient::new(config.clone(), Arc::clone(&store)).map_err(|e| e.to_string())?);
    let navigator: Arc<dyn Navigator> = Arc::new(navigator);
    let routes = SiteRoutes::default();

    let session = Arc::new(SessionManager::new(client.clone(), navigator.clone(), routes.clone(), config.site_url));
    let gate = AccessGate::new(RouteTable::default(), RedirectStore::new(Arc::clone(&store)), navigator, routes);
    Ok(Services { session, gate, content: client, store, mutations: InFlightGuard::new() })
}

/// Root application component.
///
/// Owns the session subscription for the lifetime of the shell and provides
/// all shared state contexts.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    let notice = RwSignal::new(NoticeState::default());
    let route_state: RouteState = RwSignal::new(None);
    provide_context(auth);
    provide_context(notice);
    provide_context(route_state);

    let navigator = SignalNavigator::new();
    provide_context(navigator);
    let services = match build_services(navigator) {
        Ok(services) => services,
        Err(message) => {
            leptos::logging::error!("memberhub is not configured: {message}");
            return view! {
                <div class="config-error">
                    <h1>"Site unavailable"</h1>
                    <p>{message}</p>
                </div>
            }
            .into_any();
        }
    };

    let (guard, pump) = services.session.mount();
    #[cfg(feature = "csr")]
    {
        leptos::task::spawn_local(pump);
        leptos::task::spawn_local(crate::state::auth::mirror(services.session.watch(), move |state| {
            let _ = auth.try_set(state);
        }));
    }
    #[cfg(not(feature = "csr"))]
    drop(pump);
    on_cleanup(move || guard.release());

    provide_context(services);

    view! {
        <Title text="Memberhub"/>

        <Router>
            <NavigationBridge navigator route_state/>
            <NavBar/>
            <NoticeBar/>
            <main class="page">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("signin") view=SignInPage/>
                    <Route path=StaticSegment("reset-password") view=ResetPasswordPage/>
                    <Route
                        path=StaticSegment("videos")
                        view=|| view! { <ProtectedRoute route_id="videos"><VideosPage/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment("subscription")
                        view=|| view! { <ProtectedRoute route_id="subscription"><SubscriptionPage/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment("account")
                        view=|| view! { <ProtectedRoute route_id="account"><AccountPage/></ProtectedRoute> }
                    />
                </Routes>
            </main>
        </Router>
    }
    .into_any()
}
