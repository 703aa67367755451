//! Online/offline state from `navigator.onLine`.

use clarity_core::ports::ConnectivityPort;

pub struct NavigatorConnectivity;

impl ConnectivityPort for NavigatorConnectivity {
    fn is_online(&self) -> bool {
        // No window (worker or test runner): assume online and let the fetch decide
        web_sys::window()
            .map(|w| w.navigator().on_line())
            .unwrap_or(true)
    }
}
