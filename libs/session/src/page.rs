/// Number of numeric options shown on every page.
pub const PAGE_SIZE: u32 = 5;
pub const BACK_OPTION: &str = "Back";
pub const END_OPTION: &str = "End";

/// Options rendered for one step of the menu.
///
/// ```
/// use gsm_session::MenuPage;
///
/// let page = MenuPage::from_start(3, true).unwrap();
/// assert_eq!(page.options(), vec!["4", "5", "6", "7", "8", "Back", "End"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPage {
    start: u32,
    controls: bool,
}

impl MenuPage {
    /// Page shown right after "start": `1..=5`, no controls.
    pub fn root() -> Self {
        Self {
            start: 0,
            controls: false,
        }
    }

    /// Page listing `start + 1 ..= start + 5`. `None` when that range overflows.
    pub fn from_start(start: u32, controls: bool) -> Option<Self> {
        start.checked_add(PAGE_SIZE)?;
        Some(Self { start, controls })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn has_controls(&self) -> bool {
        self.controls
    }

    pub fn numbers(&self) -> Vec<u32> {
        (self.start + 1..=self.start + PAGE_SIZE).collect()
    }

    /// Quick reply titles in display order.
    pub fn options(&self) -> Vec<String> {
        let mut options: Vec<String> = self.numbers().iter().map(u32::to_string).collect();
        if self.controls {
            options.push(BACK_OPTION.to_string());
            options.push(END_OPTION.to_string());
        }
        options
    }
}
