/// Aggregated render output for the active UI frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub status: StatusBar,
    pub content: ViewContent,
    pub modal: Option<ModalContent>,
    pub notice: Option<String>,
    pub hint_bar: HintBar,
}

/// Phone-style status strip across the top of every frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusBar {
    pub clock: String,
    pub synced: bool,
    pub battery_percent: u8,
}

/// Footer with per-screen key hints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintBar {
    pub hints: Vec<HintItem>,
}

impl HintBar {
    pub fn new(hints: Vec<HintItem>) -> Self {
        Self { hints }
    }
}

/// Key-action pairing presented in the hint bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintItem {
    pub key: String,
    pub action: String,
}

impl HintItem {
    pub fn new<K: Into<String>, A: Into<String>>(key: K, action: A) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Content rendered for the active base screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewContent {
    Home(HomeView),
    Detail(DetailView),
}

/// Overlay rendered above the base screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalContent {
    Consent(ConsentView),
    Upload(UploadView),
}

/// Dashboard section currently holding keyboard focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeSection {
    Timeline,
    QuickActions,
    ShareCard,
}

/// App header with branding and the patient avatar initials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderView {
    pub app_name: String,
    pub tagline: String,
    pub initials: String,
}

/// Emergency card with its optional expanded QR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmergencyCard {
    pub summary: String,
    pub shown: bool,
    pub qr: Option<String>,
}

/// Patient profile summary card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileCard {
    pub patient: String,
    pub curp: String,
    pub chips: Vec<String>,
}

/// Single timeline row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineItem {
    pub date: String,
    pub title: String,
    pub meta: String,
    pub tag: String,
}

/// Record timeline, most recent first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineList {
    pub items: Vec<TimelineItem>,
    pub selected: Option<usize>,
}

/// One of the three dashboard quick actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuickAction {
    pub label: String,
    pub icon: String,
}

/// Quick-action row with its selection cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuickActionsRow {
    pub actions: Vec<QuickAction>,
    pub selected: Option<usize>,
}

/// Individual share-settings checkbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareToggle {
    pub label: String,
    pub enabled: bool,
}

/// "Share with a doctor" card: toggles, placeholders, and the current QR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareCard {
    pub toggles: Vec<ShareToggle>,
    pub selected: Option<usize>,
    pub expires_label: String,
    pub recipient: String,
    pub qr: Option<String>,
}

/// Bottom navigation bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabBar {
    pub labels: Vec<String>,
    pub active: usize,
}

/// Composite dashboard view model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeView {
    pub header: HeaderView,
    pub emergency: EmergencyCard,
    pub profile: ProfileCard,
    pub timeline: TimelineList,
    pub quick_actions: QuickActionsRow,
    pub share: ShareCard,
    pub tabs: TabBar,
    pub focus: HomeSection,
}

/// Label/value row inside a detail section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
    pub range: Option<String>,
    pub status: Option<String>,
}

/// Titled group of detail rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailSection {
    pub title: String,
    pub rows: Vec<DetailRow>,
}

/// Record detail screen view model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub date: String,
    pub meta: String,
    pub tag: String,
    pub sections: Vec<DetailSection>,
    pub actions: Vec<String>,
    pub selected_action: Option<usize>,
    pub note_draft: String,
    pub notes_focused: bool,
}

/// Consent dialog lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsentPhase {
    Form,
    Granting,
    Complete,
}

/// Form group currently holding focus inside the consent dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsentFocus {
    Doctors,
    Scopes,
    Durations,
    Grant,
}

/// Doctor row in the consent form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoctorChoice {
    pub name: String,
    pub specialty: String,
    pub hospital: String,
    pub verified: bool,
    pub selected: bool,
}

/// Scope row in the consent form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeChoice {
    pub label: String,
    pub description: String,
    pub selected: bool,
}

/// Duration cell in the consent form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DurationChoice {
    pub label: String,
    pub selected: bool,
}

/// Consent dialog view model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsentView {
    pub phase: ConsentPhase,
    pub record_title: String,
    pub record_date: String,
    pub doctors: Vec<DoctorChoice>,
    pub scopes: Vec<ScopeChoice>,
    pub durations: Vec<DurationChoice>,
    pub focus: ConsentFocus,
    pub cursor: usize,
    pub summary: Option<String>,
    pub can_grant: bool,
    pub complete_message: Option<String>,
}

/// Upload dialog lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadPhase {
    Disconnected,
    Connecting,
    Connected,
    Uploading,
    Complete,
}

/// Upload dialog focus target while connected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadFocus {
    Files,
    Submit,
}

/// File row in the upload picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileChoice {
    pub name: String,
    pub size_label: String,
    pub selected: bool,
}

/// Upload dialog view model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadView {
    pub phase: UploadPhase,
    pub address: Option<String>,
    pub chain_id: Option<u64>,
    pub pairing_qr: Option<String>,
    pub files: Vec<FileChoice>,
    pub cursor: usize,
    pub focus: UploadFocus,
    pub complete_message: Option<String>,
}
