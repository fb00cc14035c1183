// Copyright (c) 2026 rezky_nightky

use clap::ValueEnum;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Classic,
    Colorful,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Intensity {
    Dim,
    #[default]
    Normal,
    Bright,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    Flat,
    #[default]
    Cylinder,
    Scene,
}
