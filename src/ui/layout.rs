use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const TICKER_HEIGHT: u16 = 3;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub logs: Rect,
    pub ticker: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        if full_screen {
            let [body] = Layout::vertical([Constraint::Fill(1)]).areas(area);
            let (main, logs) = Self::split_logs(body, show_logs);
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                main,
                logs,
                ticker: Rect::ZERO,
            };
        }

        let [tab, body, ticker] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(TICKER_HEIGHT),
        ])
        .areas(area);
        let (main, logs) = Self::split_logs(body, show_logs);

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            main,
            logs,
            ticker,
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(area)
    }

    fn split_logs(area: Rect, show_logs: bool) -> (Rect, Rect) {
        if !show_logs {
            return (area, Rect::ZERO);
        }
        let [main, logs] =
            Layout::vertical([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(area);
        (main, logs)
    }
}
