use crate::location::GeocodeResolver;

pub struct AppState<C, S> {
    pub resolver: GeocodeResolver<C, S>,
}
