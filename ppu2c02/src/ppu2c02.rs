use crate::background::Background;
use crate::ppu2c02_registers::{ControlReg, MaskReg, Register, StatusReg};
use crate::sprite::{Sprite, SpriteAttribute, SpriteSlot};
use crate::vram_address::VramAddress;
use common::{interconnection::PPUCPUConnection, Bus, Device};
use display::{Color, FrameHandle, COLORS, TV};
use std::cell::Cell;

const VISIBLE_SCANLINES: u16 = 240;
const VBLANK_SCANLINE: u16 = 241;
const PRE_RENDER_SCANLINE: u16 = 261;
const LAST_CYCLE: u16 = 340;

/// A sprite pixel that won over the other sprites of the line
struct SpritePixel {
    color_bits: u8,
    attributes: SpriteAttribute,
    is_sprite_0: bool,
}

pub struct PPU2C02<T: Bus> {
    reg_control: ControlReg,
    reg_mask: MaskReg,
    reg_status: Cell<StatusReg>,
    reg_oam_addr: u8,

    scanline: u16,
    cycle: u16,
    is_odd_frame: bool,

    /// `v`, also moved by PPUDATA reads which only borrow `self`
    vram_address: Cell<VramAddress>,
    /// `t`, the scroll position of the top left pixel
    temp_vram_address: VramAddress,
    fine_x_scroll: u8,
    /// shared by PPUSCROLL and PPUADDR to know which write is next
    w_toggle: Cell<bool>,

    ppu_data_read_buffer: Cell<u8>,

    /// the value left on the data lines between the CPU and the PPU, write
    /// only registers read it back
    io_latch: Cell<u8>,

    background: Background,

    primary_oam: [Sprite; 64],
    secondary_oam: [Sprite; 8],
    secondary_oam_count: usize,
    sprite_slots: [SpriteSlot; 8],
    sprite_0_next_line: bool,
    sprite_0_on_line: bool,

    nmi_pin_status: Cell<bool>,
    /// the level of (vblank && NMI enabled), the pin is raised on its rising edge
    nmi_line: Cell<bool>,

    is_dma_request: bool,
    dma_request_address: u8,

    bus: T,
    tv: TV,
}

impl<T> PPU2C02<T>
where
    T: Bus,
{
    pub fn new(bus: T, tv: TV) -> Self {
        Self {
            reg_control: ControlReg::empty(),
            reg_mask: MaskReg::empty(),
            reg_status: Cell::new(StatusReg::empty()),
            reg_oam_addr: 0,

            scanline: 0,
            cycle: 0,
            is_odd_frame: false,

            vram_address: Cell::new(VramAddress::default()),
            temp_vram_address: VramAddress::default(),
            fine_x_scroll: 0,
            w_toggle: Cell::new(false),

            ppu_data_read_buffer: Cell::new(0),
            io_latch: Cell::new(0),

            background: Background::default(),

            primary_oam: [Sprite::empty(); 64],
            secondary_oam: [Sprite::filled_ff(); 8],
            secondary_oam_count: 0,
            sprite_slots: [SpriteSlot::empty(); 8],
            sprite_0_next_line: false,
            sprite_0_on_line: false,

            nmi_pin_status: Cell::new(false),
            nmi_line: Cell::new(false),

            is_dma_request: false,
            dma_request_address: 0,

            bus,
            tv,
        }
    }

    /// The reset line, registers go back to their power up values and the
    /// frame restarts. OAM, VRAM and palette are kept.
    pub fn reset(&mut self) {
        self.reg_control = ControlReg::empty();
        self.reg_mask = MaskReg::empty();
        self.reg_status.set(StatusReg::empty());

        self.scanline = 0;
        self.cycle = 0;
        self.is_odd_frame = false;

        self.temp_vram_address = VramAddress::default();
        self.fine_x_scroll = 0;
        self.w_toggle.set(false);
        self.ppu_data_read_buffer.set(0);

        self.nmi_pin_status.set(false);
        self.nmi_line.set(false);
        self.is_dma_request = false;
    }

    /// expose the bus for reading only
    pub fn ppu_bus(&self) -> &T {
        &self.bus
    }

    pub fn ppu_bus_mut(&mut self) -> &mut T {
        &mut self.bus
    }

    /// (scanline, dot), the pre-render line is 261
    pub fn position(&self) -> (u16, u16) {
        (self.scanline, self.cycle)
    }

    /// frames completed, a frame completes when vblank starts
    pub fn frame_count(&self) -> u64 {
        self.tv.frames_count()
    }

    pub fn frame_handle(&self) -> FrameHandle {
        self.tv.frame_handle()
    }

    /// OAM content as seen through OAMDATA
    pub fn oam_byte(&self, address: u8) -> u8 {
        self.primary_oam[(address >> 2) as usize].read_offset(address)
    }

    /// (`v`, `t`, fine X, `w`)
    #[cfg(test)]
    pub(crate) fn scroll_state(&self) -> (u16, u16, u8, bool) {
        (
            self.vram_address.get().address(),
            self.temp_vram_address.address(),
            self.fine_x_scroll,
            self.w_toggle.get(),
        )
    }

    fn write_oam_byte(&mut self, address: u8, data: u8) {
        self.primary_oam[(address >> 2) as usize].write_offset(address, data);
    }

    fn read_bus(&self, address: u16) -> u8 {
        self.bus.read(address, Device::Ppu)
    }

    fn write_bus(&mut self, address: u16, data: u8) {
        self.bus.write(address, data, Device::Ppu);
    }

    pub(crate) fn read_register(&self, register: Register) -> u8 {
        let data = match register {
            Register::Status => {
                let status = self.reg_status.get();

                self.reg_status.set(status - StatusReg::VERTICAL_BLANK);
                self.w_toggle.set(false);
                self.update_nmi_line();

                // the low 5 bits are whatever was left on the bus
                status.bits() & 0xE0 | self.io_latch.get() & 0x1F
            }
            Register::OamData => self.oam_byte(self.reg_oam_addr),
            Register::PPUData => self.read_data_port(),
            // write only
            _ => self.io_latch.get(),
        };

        self.io_latch.set(data);

        data
    }

    pub(crate) fn write_register(&mut self, register: Register, data: u8) {
        self.io_latch.set(data);

        match register {
            Register::Control => {
                self.reg_control = ControlReg::from_bits_truncate(data);
                self.temp_vram_address
                    .set_nametable(self.reg_control.nametable());

                // enabling NMI in the middle of vblank triggers it right away
                self.update_nmi_line();
            }
            Register::Mask => self.reg_mask = MaskReg::from_bits_truncate(data),
            Register::Status => {}
            Register::OamAddress => self.reg_oam_addr = data,
            Register::OamData => {
                self.write_oam_byte(self.reg_oam_addr, data);
                self.reg_oam_addr = self.reg_oam_addr.wrapping_add(1);
            }
            Register::Scroll => {
                if self.w_toggle.get() {
                    self.temp_vram_address.set_y_scroll(data);
                } else {
                    self.fine_x_scroll = self.temp_vram_address.set_x_scroll(data);
                }

                self.w_toggle.set(!self.w_toggle.get());
            }
            Register::PPUAddress => {
                if self.w_toggle.get() {
                    self.temp_vram_address.set_low_byte(data);
                    self.vram_address.set(self.temp_vram_address);
                } else {
                    self.temp_vram_address.set_high_byte(data);
                }

                self.w_toggle.set(!self.w_toggle.get());
            }
            Register::PPUData => {
                let address = self.vram_address.get().address() & 0x3FFF;

                self.write_bus(address, data);
                self.increment_data_address();
            }
        }
    }

    /// Everything below the palette goes through the read buffer, palette
    /// reads are direct but still refill the buffer with the nametable byte
    /// "under" them.
    fn read_data_port(&self) -> u8 {
        let address = self.vram_address.get().address() & 0x3FFF;

        let data = if address >= 0x3F00 {
            self.ppu_data_read_buffer
                .set(self.read_bus(address & 0x2FFF));

            // palette entries are 6 bits
            self.read_bus(address) & 0x3F | self.io_latch.get() & 0xC0
        } else {
            self.ppu_data_read_buffer.replace(self.read_bus(address))
        };

        self.increment_data_address();

        data
    }

    fn increment_data_address(&self) {
        let mut vram_address = self.vram_address.get();
        vram_address.increment(self.reg_control.vram_increment());
        self.vram_address.set(vram_address);
    }

    /// `$4014` write, the CPU picks it up through [`PPUCPUConnection`]
    pub(crate) fn request_dma(&mut self, page: u8) {
        self.io_latch.set(page);
        self.dma_request_address = page;
        self.is_dma_request = true;
    }

    fn update_nmi_line(&self) {
        let line = self.reg_control.nmi_enabled()
            && self.reg_status.get().contains(StatusReg::VERTICAL_BLANK);

        if line && !self.nmi_line.get() {
            self.nmi_pin_status.set(true);
        }

        self.nmi_line.set(line);
    }

    /// advance `dots` PPU cycles, 3 for each CPU cycle on NTSC
    pub fn execute(&mut self, dots: u32) {
        for _ in 0..dots {
            self.clock();
        }
    }

    /// one dot
    pub fn clock(&mut self) {
        let rendering_enabled = self.reg_mask.rendering_enabled();

        match self.scanline {
            0..=239 => {
                if rendering_enabled {
                    self.run_background_dot();
                    self.run_sprite_dot();
                }

                if (1..=256).contains(&self.cycle) {
                    self.render_pixel();
                }
            }
            VBLANK_SCANLINE if self.cycle == 1 => {
                self.reg_status
                    .set(self.reg_status.get() | StatusReg::VERTICAL_BLANK);
                self.update_nmi_line();

                self.tv.signal_end_of_frame();
            }
            PRE_RENDER_SCANLINE => {
                if self.cycle == 1 {
                    self.reg_status.set(StatusReg::empty());
                    self.update_nmi_line();
                }

                if rendering_enabled {
                    self.run_background_dot();
                    self.run_sprite_dot();

                    if (280..=304).contains(&self.cycle) {
                        let top_left = self.temp_vram_address;
                        self.vram_address.get_mut().copy_vertical(top_left);
                    }
                }
            }
            // post-render and vblank lines are idle
            _ => {}
        }

        self.advance_dot(rendering_enabled);
    }

    fn advance_dot(&mut self, rendering_enabled: bool) {
        // the odd frame skips the last dot of the pre-render line
        let last_cycle =
            if self.scanline == PRE_RENDER_SCANLINE && self.is_odd_frame && rendering_enabled {
                LAST_CYCLE - 1
            } else {
                LAST_CYCLE
            };

        if self.cycle < last_cycle {
            self.cycle += 1;
            return;
        }

        self.cycle = 0;

        if self.scanline == PRE_RENDER_SCANLINE {
            self.scanline = 0;
            self.is_odd_frame = !self.is_odd_frame;
        } else {
            self.scanline += 1;
        }
    }

    /// Tile fetches every 8 dots of 1-256 (this line) and 321-336 (the
    /// first two tiles of the next one), each one 2 dots long:
    ///
    /// | dot % 8 | fetch                                    |
    /// |---------|------------------------------------------|
    /// | 1       | reload the shifters, nametable byte      |
    /// | 3       | attribute byte                           |
    /// | 5       | pattern low plane                        |
    /// | 7       | pattern high plane                       |
    /// | 0       | coarse X increment                       |
    fn run_background_dot(&mut self) {
        let cycle = self.cycle;

        if matches!(cycle, 2..=257 | 322..=337) {
            self.background.shift();
        }

        if matches!(cycle, 1..=256 | 321..=336) {
            match cycle % 8 {
                1 => {
                    self.background.reload();
                    self.fetch_tile_index();
                }
                3 => {
                    let vram_address = self.vram_address.get();
                    let attribute = self.read_bus(vram_address.attribute_address());

                    self.background
                        .latch_palette(attribute >> vram_address.attribute_shift());
                }
                5 => self.fetch_background_pattern(0),
                7 => self.fetch_background_pattern(1),
                0 => self.vram_address.get_mut().increment_coarse_x(),
                _ => {}
            }
        }

        match cycle {
            256 => self.vram_address.get_mut().increment_y(),
            257 => {
                self.background.reload();

                let top_left = self.temp_vram_address;
                self.vram_address.get_mut().copy_horizontal(top_left);
            }
            // unused fetches at the end of the line
            338 | LAST_CYCLE => self.fetch_tile_index(),
            _ => {}
        }
    }

    fn fetch_tile_index(&mut self) {
        let tile_index = self.read_bus(self.vram_address.get().tile_address());
        self.background.latch_tile_index(tile_index);
    }

    /// ## PPU pattern table addressing ##
    /// ```text
    /// DCBA98 76543210
    /// ---------------
    /// 0HRRRR CCCCPTTT
    /// |||||| |||||+++- T: Fine Y offset, the row number within a tile
    /// |||||| ||||+---- P: Bit plane (0: "lower"; 1: "upper")
    /// |||||| ++++----- C: Tile column
    /// ||++++---------- R: Tile row
    /// |+-------------- H: Half of sprite table (0: "left"; 1: "right")
    /// +--------------- 0: Pattern table is at $0000-$1FFF
    /// ```
    fn pattern_address(pattern_table: u16, tile: u8, plane: usize, row: u8) -> u16 {
        pattern_table | (tile as u16) << 4 | (plane as u16) << 3 | (row & 0b111) as u16
    }

    fn fetch_background_pattern(&mut self, plane: usize) {
        let address = Self::pattern_address(
            self.reg_control.background_pattern_table(),
            self.background.tile_index(),
            plane,
            self.vram_address.get().fine_y(),
        );

        let data = self.read_bus(address);
        self.background.latch_pattern(plane, data);
    }

    /// Visible lines evaluate the sprites of the next line: secondary OAM is
    /// cleared over 1-64, one primary entry is checked every 3 dots from 65,
    /// and the found sprites are fetched at 257. OAMADDR is held at 0 during
    /// the fetch dots 257-320.
    fn run_sprite_dot(&mut self) {
        let cycle = self.cycle;
        let is_visible_line = self.scanline < VISIBLE_SCANLINES;

        match cycle {
            1..=64 if is_visible_line => {
                if cycle == 1 {
                    self.secondary_oam_count = 0;
                    self.sprite_0_next_line = false;
                }

                if cycle % 2 == 1 {
                    let index = ((cycle - 1) / 2) as u8;
                    self.secondary_oam[(index >> 2) as usize].write_offset(index, 0xFF);
                }
            }
            65..=254 if is_visible_line && (cycle - 65) % 3 == 0 => {
                self.evaluate_sprite(((cycle - 65) / 3) as usize);
            }
            257..=320 => {
                if cycle == 257 {
                    self.load_sprite_slots();
                }

                self.reg_oam_addr = 0;
            }
            _ => {}
        }
    }

    fn evaluate_sprite(&mut self, index: usize) {
        let sprite = self.primary_oam[index];
        let height = self.reg_control.sprite_height();

        if sprite.row_on(self.scanline, height).is_none() {
            return;
        }

        if index == 0 {
            self.sprite_0_next_line = true;
        }

        match self.secondary_oam.get_mut(self.secondary_oam_count) {
            Some(entry) => {
                *entry = sprite;
                self.secondary_oam_count += 1;
            }
            // the hardware overflow bug (false positives and negatives) is not emulated
            None => self
                .reg_status
                .set(self.reg_status.get() | StatusReg::SPRITE_OVERFLOW),
        }
    }

    /// nothing is evaluated on the pre-render line, so line 0 has no sprites
    fn load_sprite_slots(&mut self) {
        let count = if self.scanline == PRE_RENDER_SCANLINE {
            0
        } else {
            self.secondary_oam_count
        };

        self.sprite_0_on_line = count != 0 && self.sprite_0_next_line;
        self.sprite_0_next_line = false;

        for i in 0..self.sprite_slots.len() {
            let slot = if i < count {
                let sprite = self.secondary_oam[i];
                let row = (self.scanline as u8).wrapping_sub(sprite.read_offset(0));

                SpriteSlot::new(
                    self.fetch_sprite_pattern(&sprite, row),
                    sprite.get_attribute(),
                    sprite.get_x(),
                )
            } else {
                SpriteSlot::empty()
            };

            self.sprite_slots[i] = slot;
        }
    }

    fn fetch_sprite_pattern(&self, sprite: &Sprite, row: u8) -> [u8; 2] {
        let height = self.reg_control.sprite_height();
        let attributes = sprite.get_attribute();

        let row = if attributes.contains(SpriteAttribute::FLIP_VERTICAL) {
            (height - 1).wrapping_sub(row)
        } else {
            row
        };

        // 8x16 sprites take the table from bit 0 of the tile, the top half
        // is the even tile and the bottom half the one after it
        let (pattern_table, tile) = if height == 16 {
            let tile = sprite.get_tile();
            (((tile & 1) as u16) << 12, tile & 0xFE)
        } else {
            (self.reg_control.sprite_pattern_table(), sprite.get_tile())
        };
        let tile = tile.wrapping_add(row >> 3);

        let pattern = [
            self.read_bus(Self::pattern_address(pattern_table, tile, 0, row)),
            self.read_bus(Self::pattern_address(pattern_table, tile, 1, row)),
        ];

        if attributes.contains(SpriteAttribute::FLIP_HORIZONTAL) {
            [pattern[0].reverse_bits(), pattern[1].reverse_bits()]
        } else {
            pattern
        }
    }

    /// every slot is clocked, the first non transparent one is returned
    fn next_sprite_pixel(&mut self) -> Option<SpritePixel> {
        let mut result = None;

        for (i, slot) in self.sprite_slots.iter_mut().enumerate() {
            match slot.tick() {
                Some(color_bits) if color_bits != 0 && result.is_none() => {
                    result = Some(SpritePixel {
                        color_bits,
                        attributes: slot.attributes(),
                        is_sprite_0: i == 0 && self.sprite_0_on_line,
                    });
                }
                _ => {}
            }
        }

        result
    }

    /// The background/sprite multiplexer, with sprite 0 hit detection.
    ///
    /// ## color location offset 0x3F00 ##
    /// ```text
    /// 43210
    /// |||||
    /// |||++- Pixel value from tile data
    /// |++--- Palette number from attribute table or OAM
    /// +----- Background/Sprite select
    /// ```
    fn generate_pixel(&mut self, x: u16) -> u8 {
        let (background_color_bits, background_palette) = if self.reg_mask.shows_background_at(x) {
            self.background.pixel(self.fine_x_scroll)
        } else {
            (0, 0)
        };

        // the sprite slots must be clocked even if the pixel is hidden
        let sprite = self
            .next_sprite_pixel()
            .filter(|_| self.reg_mask.shows_sprites_at(x));

        let (selector, palette, color_bits) = match sprite {
            Some(sprite) if background_color_bits != 0 => {
                if sprite.is_sprite_0 && x != 255 {
                    self.reg_status
                        .set(self.reg_status.get() | StatusReg::SPRITE_0_HIT);
                }

                if sprite.attributes.is_behind_background() {
                    (0, background_palette, background_color_bits)
                } else {
                    (1, sprite.attributes.palette(), sprite.color_bits)
                }
            }
            Some(sprite) => (1, sprite.attributes.palette(), sprite.color_bits),
            None => (0, background_palette, background_color_bits),
        };

        // color 0 of any palette is the universal background color
        let index = if color_bits == 0 {
            0
        } else {
            selector << 4 | palette << 2 | color_bits
        };

        self.read_bus(0x3F00 | index as u16)
    }

    /// every emphasized channel is boosted and the other two are dimmed
    fn apply_emphasis(&self, color: Color) -> Color {
        let emphasis = [
            MaskReg::EMPHASIZE_RED,
            MaskReg::EMPHASIZE_GREEN,
            MaskReg::EMPHASIZE_BLUE,
        ];

        let mut factors = [1.0f32; 3];
        for (channel, &flag) in emphasis.iter().enumerate() {
            if self.reg_mask.contains(flag) {
                for (i, factor) in factors.iter_mut().enumerate() {
                    *factor *= if i == channel { 1.1 } else { 0.9 };
                }
            }
        }

        let scale = |value: u8, factor: f32| (value as f32 * factor).min(255.) as u8;

        Color {
            r: scale(color.r, factors[0]),
            g: scale(color.g, factors[1]),
            b: scale(color.b, factors[2]),
        }
    }

    fn render_pixel(&mut self) {
        let x = self.cycle - 1;

        let mut color_index = self.generate_pixel(x) & 0x3F;
        if self.reg_mask.contains(MaskReg::GRAYSCALE) {
            // the gray column, 0x00, 0x10, 0x20 and 0x30
            color_index &= 0x30;
        }

        let color = self.apply_emphasis(COLORS[color_index as usize]);
        self.tv.set_pixel(x as u32, self.scanline as u32, &color);
    }
}

impl<T> PPUCPUConnection for PPU2C02<T>
where
    T: Bus,
{
    fn is_nmi_pin_set(&self) -> bool {
        self.nmi_pin_status.get()
    }

    fn clear_nmi_pin(&mut self) {
        self.nmi_pin_status.set(false);
    }

    fn is_dma_request(&self) -> bool {
        self.is_dma_request
    }

    fn clear_dma_request(&mut self) {
        self.is_dma_request = false;
    }

    fn dma_address(&self) -> u8 {
        self.dma_request_address
    }
}
