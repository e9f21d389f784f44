use ratatui::style::Color;

/// Colors used by the prompter widgets
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg0: Color,
    pub bg2: Color,
    pub fg0: Color,
    pub grey2: Color,

    pub red: Color,
    pub yellow: Color,
    pub aqua: Color,

    /// Container border while idle
    pub border: Color,
    /// Container border while dragging or resizing
    pub border_active: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            red: Color::Rgb(0xea, 0x69, 0x62),
            yellow: Color::Rgb(0xd8, 0xa6, 0x57),
            aqua: Color::Rgb(0x89, 0xb4, 0x82),
            border: Color::Rgb(0x7c, 0x6f, 0x64),
            border_active: Color::Rgb(0xd8, 0xa6, 0x57),
        }
    }
}
