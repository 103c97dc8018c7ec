use ratatui::style::Color;

#[derive(Clone)]
pub struct Theme {
    pub name: &'static str,
    pub accent: Color,
    pub bg: Color,
    pub header_bg: Color,
    pub status_bg: Color,
    pub panel_bg: Color,
    pub text: Color,
    pub muted: Color,
}

pub const THEMES: &[Theme] = &[
    Theme {
        name: "Dark",
        accent: Color::Rgb(92, 136, 255),
        bg: Color::Rgb(20, 20, 20),
        header_bg: Color::Rgb(40, 60, 110),
        status_bg: Color::Rgb(10, 10, 10),
        panel_bg: Color::Rgb(30, 30, 30),
        text: Color::White,
        muted: Color::Rgb(110, 110, 110),
    },
    Theme {
        name: "Light",
        accent: Color::Rgb(0, 90, 180),
        bg: Color::Rgb(245, 245, 245),
        header_bg: Color::Rgb(215, 225, 245),
        status_bg: Color::Rgb(230, 230, 230),
        panel_bg: Color::Rgb(255, 255, 255),
        text: Color::Rgb(20, 20, 20),
        muted: Color::Rgb(130, 130, 130),
    },
    Theme {
        name: "Dracula",
        accent: Color::Rgb(189, 147, 249),
        bg: Color::Rgb(40, 42, 54),
        header_bg: Color::Rgb(68, 71, 90),
        status_bg: Color::Rgb(33, 34, 44),
        panel_bg: Color::Rgb(50, 52, 64),
        text: Color::Rgb(248, 248, 242),
        muted: Color::Rgb(98, 114, 164),
    },
    Theme {
        name: "Nord",
        accent: Color::Rgb(136, 192, 208),
        bg: Color::Rgb(46, 52, 64),
        header_bg: Color::Rgb(59, 66, 82),
        status_bg: Color::Rgb(36, 41, 51),
        panel_bg: Color::Rgb(59, 66, 82),
        text: Color::Rgb(236, 239, 244),
        muted: Color::Rgb(118, 128, 148),
    },
    Theme {
        name: "Gruvbox Dark",
        accent: Color::Rgb(251, 73, 52),
        bg: Color::Rgb(40, 40, 40),
        header_bg: Color::Rgb(60, 56, 54),
        status_bg: Color::Rgb(29, 32, 33),
        panel_bg: Color::Rgb(50, 48, 47),
        text: Color::Rgb(235, 219, 178),
        muted: Color::Rgb(146, 131, 116),
    },
];

pub fn theme_at(index: usize) -> &'static Theme {
    &THEMES[index % THEMES.len()]
}

#[cfg(test)]
mod tests {
    use super::{theme_at, THEMES};

    #[test]
    fn index_wraps_around() {
        assert_eq!(theme_at(0).name, "Dark");
        assert_eq!(theme_at(THEMES.len()).name, "Dark");
        assert_eq!(theme_at(THEMES.len() + 2).name, THEMES[2].name);
    }
}
