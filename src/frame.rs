// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/frame.rs - NCHW 帧定义与预处理
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use image::{RgbImage, imageops::FilterType};

const RGB_CHANNELS: usize = 3;

/// 分类网络的输入边长
pub const CLASSIFIER_INPUT_SIZE: u32 = 224;

pub type ClassifierFrame = RgbNchwFrame<CLASSIFIER_INPUT_SIZE, CLASSIFIER_INPUT_SIZE>;

pub trait AsNchwFrame<const W: u32, const H: u32> {
  fn as_nchw(&self) -> &[f32];
}

/// 单张 RGB 图像的 NCHW 浮点帧（不含批次维度），数值范围 [0, 1]
#[derive(Debug, Clone)]
pub struct RgbNchwFrame<const W: u32, const H: u32> {
  data: Box<[f32]>,
}

impl<const W: u32, const H: u32> Default for RgbNchwFrame<W, H> {
  fn default() -> Self {
    let size = RGB_CHANNELS * (W as usize) * (H as usize);
    let data = vec![0f32; size].into_boxed_slice();
    Self { data }
  }
}

impl<const W: u32, const H: u32> RgbNchwFrame<W, H> {
  pub fn height(&self) -> usize {
    H as usize
  }

  pub fn width(&self) -> usize {
    W as usize
  }

  pub fn channels(&self) -> usize {
    RGB_CHANNELS
  }

  /// 带批次维度的张量形状 [1, C, H, W]
  pub fn batch_shape(&self) -> [usize; 4] {
    [1, RGB_CHANNELS, H as usize, W as usize]
  }
}

impl<const W: u32, const H: u32> AsMut<[f32]> for RgbNchwFrame<W, H> {
  fn as_mut(&mut self) -> &mut [f32] {
    &mut self.data
  }
}

impl<const W: u32, const H: u32> AsNchwFrame<W, H> for RgbNchwFrame<W, H> {
  fn as_nchw(&self) -> &[f32] {
    &self.data
  }
}

/// 缩放到 W x H（不保持宽高比，双线性插值），再按 1/255 归一化
///
/// 与训练时的 `Resize((224, 224))` + `ToTensor()` 保持一致，不做均值方差归一化。
impl<const W: u32, const H: u32> From<&RgbImage> for RgbNchwFrame<W, H> {
  fn from(image: &RgbImage) -> Self {
    let resized = if image.dimensions() == (W, H) {
      image.clone()
    } else {
      image::imageops::resize(image, W, H, FilterType::Triangle)
    };

    let mut frame = Self::default();
    let plane = (W as usize) * (H as usize);
    let slice = frame.as_mut();

    for (x, y, pixel) in resized.enumerate_pixels() {
      let offset = (y as usize) * (W as usize) + (x as usize);
      for c in 0..RGB_CHANNELS {
        slice[c * plane + offset] = f32::from(pixel[c]) / 255.0;
      }
    }
    frame
  }
}
