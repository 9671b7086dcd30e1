use absa_domain::state::{AppState, BrandSettingsPatch};

pub struct SettingsService;

impl SettingsService {
    /// Shallow-merges `patch` onto the brand settings.
    pub fn update_brand_settings(state: &AppState, patch: BrandSettingsPatch) -> AppState {
        let mut next = state.clone();
        patch.apply(&mut next.brand_settings);
        next
    }
}
