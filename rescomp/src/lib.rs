// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Firmware resource compiler front end.

Loads a JSON resource definition (namespace plus an ordered list of
category descriptors), drives the packing pipeline in
`firmware-packed-resources`, and writes the compiled artifacts: the
resource image, the master index, and accessor specifications for
categories that need a specialized manager.

Target differences are expressed entirely as different definition files;
nothing in the pipeline branches on a target.
*/

pub mod compile;
pub mod config;
pub mod manager;
